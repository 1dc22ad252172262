// ============================================================================
// ROUTES - Route table, login location and login query parsing
// ============================================================================

use url::form_urlencoded;

use crate::utils::{EXPIRED_PARAM, HOME_PATH, LOGIN_PATH, REDIRECT_PARAM};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    DashboardAvancado,
    Pacientes,
    Consultas,
    Telemedicina,
    NotFound,
}

impl Route {
    /// Screens listed in the side navigation, in display order
    pub const NAVIGATION: [Route; 5] = [
        Route::Dashboard,
        Route::DashboardAvancado,
        Route::Pacientes,
        Route::Consultas,
        Route::Telemedicina,
    ];

    pub fn from_location(location: &str) -> Self {
        let (path, _) = split_location(location);
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/login" => Route::Login,
            "/" => Route::Dashboard,
            "/dashboard-avancado" => Route::DashboardAvancado,
            "/pacientes" => Route::Pacientes,
            "/consultas" => Route::Consultas,
            "/telemedicina" => Route::Telemedicina,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => LOGIN_PATH,
            Route::Dashboard => HOME_PATH,
            Route::DashboardAvancado => "/dashboard-avancado",
            Route::Pacientes => "/pacientes",
            Route::Consultas => "/consultas",
            Route::Telemedicina => "/telemedicina",
            Route::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::DashboardAvancado => "Dashboard Avançado",
            Route::Pacientes => "Pacientes",
            Route::Consultas => "Consultas",
            Route::Telemedicina => "Telemedicina",
            Route::NotFound => "Página não encontrada",
        }
    }

    /// Everything except the login screen sits behind the route guard.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Splits `"/a?b=c"` into `("/a", "b=c")`.
pub fn split_location(location: &str) -> (&str, &str) {
    let location = location.split('#').next().unwrap_or(location);
    match location.split_once('?') {
        Some((path, query)) => (path, query),
        None => (location, ""),
    }
}

/// Builds `/login` with the optional `redirect` and `expired` parameters.
pub fn login_location(redirect: Option<&str>, expired: bool) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if let Some(redirect) = redirect {
        serializer.append_pair(REDIRECT_PARAM, redirect);
    }
    if expired {
        serializer.append_pair(EXPIRED_PARAM, "true");
    }

    let query = serializer.finish();
    if query.is_empty() {
        LOGIN_PATH.to_string()
    } else {
        format!("{}?{}", LOGIN_PATH, query)
    }
}

/// Parameters the login screen understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginQuery {
    pub redirect: Option<String>,
    pub expired: bool,
}

impl LoginQuery {
    pub fn parse(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut parsed = LoginQuery::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                REDIRECT_PARAM if !value.is_empty() => parsed.redirect = Some(value.into_owned()),
                EXPIRED_PARAM => parsed.expired = !value.is_empty() && value != "false",
                _ => {}
            }
        }
        parsed
    }

    pub fn from_location(location: &str) -> Self {
        Self::parse(split_location(location).1)
    }

    /// Where to go after a successful login. Only in-app absolute paths are
    /// honoured; anything else falls back to the home screen.
    pub fn redirect_target(&self) -> String {
        match self.redirect.as_deref() {
            Some(target) if is_safe_redirect(target) => target.to_string(),
            _ => HOME_PATH.to_string(),
        }
    }
}

fn is_safe_redirect(target: &str) -> bool {
    if !target.starts_with('/') || target.starts_with("//") || target.starts_with("/\\") {
        return false;
    }
    Route::from_location(target) != Route::Login
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_paths() {
        assert_eq!(Route::from_location("/"), Route::Dashboard);
        assert_eq!(Route::from_location(""), Route::Dashboard);
        assert_eq!(Route::from_location("/consultas?x=1"), Route::Consultas);
        assert_eq!(Route::from_location("/pacientes/"), Route::Pacientes);
        assert_eq!(Route::from_location("/login?expired=true"), Route::Login);
        assert_eq!(Route::from_location("/nada"), Route::NotFound);
        assert!(!Route::Login.is_protected());
        assert!(Route::Telemedicina.is_protected());
    }

    #[test]
    fn login_location_encodes_the_redirect() {
        assert_eq!(login_location(None, false), "/login");
        assert_eq!(login_location(Some("/consultas"), false), "/login?redirect=%2Fconsultas");
        assert_eq!(login_location(None, true), "/login?expired=true");

        let location = login_location(Some("/consultas?status=agendada&x=1"), true);
        let query = LoginQuery::from_location(&location);
        assert_eq!(query.redirect.as_deref(), Some("/consultas?status=agendada&x=1"));
        assert!(query.expired);
    }

    #[test]
    fn redirect_target_rejects_foreign_and_login_targets() {
        let target = |raw: &str| LoginQuery::parse(raw).redirect_target();
        assert_eq!(target("redirect=%2Fpacientes"), "/pacientes");
        assert_eq!(target(""), "/");
        assert_eq!(target("redirect=https%3A%2F%2Fevil.com"), "/");
        assert_eq!(target("redirect=%2F%2Fevil.com"), "/");
        assert_eq!(target("redirect=%2Flogin%3Fexpired%3Dtrue"), "/");
    }

    #[test]
    fn expired_flag_accepts_any_truthy_value() {
        assert!(LoginQuery::parse("?expired=true").expired);
        assert!(LoginQuery::parse("expired=1").expired);
        assert!(!LoginQuery::parse("expired=false").expired);
        assert!(!LoginQuery::parse("other=true").expired);
    }
}
