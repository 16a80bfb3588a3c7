use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::jwt::SESSION_TTL;
use crate::config::Environment;

pub const SESSION_COOKIE: &str = "token";

fn base(value: String, env: Environment) -> Cookie<'static> {
    let (secure, same_site) = if env.is_production() {
        (true, SameSite::None)
    } else {
        (false, SameSite::Lax)
    };
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .secure(secure)
        .same_site(same_site)
        .path("/")
        .build()
}

pub fn set_session(jar: CookieJar, token: &str, env: Environment) -> CookieJar {
    let mut cookie = base(token.to_string(), env);
    cookie.set_max_age(SESSION_TTL);
    jar.add(cookie)
}

pub fn clear_session(jar: CookieJar, env: Environment) -> CookieJar {
    let mut cookie = base(String::new(), env);
    cookie.make_removal();
    jar.add(cookie)
}

pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
}
