/// Base URL of the answering service in production builds
pub const PRODUCTION_API_BASE_URL: &str = "https://your-api-domain.com";

/// Base URL of the answering service for local development
pub const DEVELOPMENT_API_BASE_URL: &str = "http://localhost:3002";

/// Login endpoint path
pub const LOGIN_PATH: &str = "/auth/login";

/// Question endpoint path
pub const ASK_PATH: &str = "/ask";

/// A stored bearer token is valid for 8 hours after it was issued.
pub const SESSION_VALIDITY_MS: i64 = 8 * 60 * 60 * 1000;

/// Maximum accepted length (in characters) of any user input
pub const MAX_INPUT_CHARS: usize = 2000;

/// Maximum email length
pub const MAX_EMAIL_CHARS: usize = 254;

/// Accepted password length range
pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_PASSWORD_CHARS: usize = 128;

/// Conversation titles longer than this are truncated and suffixed with `...`
pub const TITLE_MAX_CHARS: usize = 50;

/// Activity label shown next to a conversation that was just touched
pub const ACTIVITY_LABEL_NOW: &str = "Agora";

/// Canned first message of every fresh chat
pub const DEFAULT_GREETING: &str =
    "Olá! Eu sou o agente de marca da No Ponto. Como posso ajudá-lo hoje?";

// User-facing messages

pub const MSG_LOGIN_OK: &str = "Login realizado com sucesso";
pub const MSG_INVALID_CREDENTIALS: &str = "Credenciais inválidas";
pub const MSG_CONNECTION_ERROR: &str = "Erro de conexão. Tente novamente.";
pub const MSG_EMPTY_ANSWER: &str = "Desculpe, não consegui entender.";
pub const MSG_GENERIC_ERROR: &str = "Ocorreu um erro. Tente novamente.";
pub const MSG_SESSION_EXPIRED: &str =
    "Sua sessão expirou. Você será redirecionado para o login.";
pub const MSG_INVALID_EMAIL: &str = "Email inválido";
pub const MSG_INVALID_PASSWORD: &str = "Senha deve ter entre 6 e 128 caracteres";

/// Demo credentials accepted by the development server
pub const DEMO_EMAIL: &str = "admin@teste.com";
pub const DEMO_PASSWORD: &str = "123456";
