/// localStorage key holding the opaque bearer token
pub const TOKEN_STORAGE_KEY: &str = "token";

/// localStorage key holding the serialized user profile
pub const USER_STORAGE_KEY: &str = "user";

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Query parameter carrying the originally requested path through login
pub const REDIRECT_PARAM: &str = "redirect";

/// Query parameter flagging a forced logout after a 401
pub const EXPIRED_PARAM: &str = "expired";

pub const SESSION_EXPIRED_BANNER: &str = "Sessão expirada. Por favor, faça login novamente.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email ou senha inválidos";
