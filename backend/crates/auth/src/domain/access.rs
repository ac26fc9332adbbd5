//! Access Control Decision
//!
//! Pure route-level decision: given a route's classification, the
//! transport of its route group and the caller's role (if any), decide
//! whether the handler runs. No I/O, no state across requests.

use crate::domain::value_object::user_role::UserRole;

/// Route sensitivity, fixed per route group at registration time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone
    Public,
    /// Only anonymous callers (login and signup pages)
    AuthOnly,
    /// Any authenticated caller
    Protected,
    /// Authenticated callers whose role satisfies `Admin`
    AdminOnly,
}

/// How rejections are expressed to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Page navigation: redirect to the login page
    Browser,
    /// JSON API: status code, no redirect
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    RedirectToLogin,
    RedirectHome,
    Unauthorized,
    Forbidden,
}

/// `role` is `None` for an anonymous caller
pub fn evaluate(access: RouteAccess, transport: Transport, role: Option<UserRole>) -> GateDecision {
    match (access, role) {
        (RouteAccess::Public, _) => GateDecision::Proceed,
        (RouteAccess::AuthOnly, None) => GateDecision::Proceed,
        (RouteAccess::AuthOnly, Some(_)) => GateDecision::RedirectHome,
        (RouteAccess::Protected | RouteAccess::AdminOnly, None) => match transport {
            Transport::Browser => GateDecision::RedirectToLogin,
            Transport::Api => GateDecision::Unauthorized,
        },
        (RouteAccess::Protected, Some(_)) => GateDecision::Proceed,
        (RouteAccess::AdminOnly, Some(role)) if role.satisfies(UserRole::Admin) => {
            GateDecision::Proceed
        }
        (RouteAccess::AdminOnly, Some(_)) => GateDecision::Forbidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GateDecision::*;
    use RouteAccess::*;
    use Transport::*;

    #[test]
    fn test_public_always_proceeds() {
        for transport in [Browser, Api] {
            assert_eq!(evaluate(Public, transport, None), Proceed);
            assert_eq!(evaluate(Public, transport, Some(UserRole::Admin)), Proceed);
        }
    }

    #[test]
    fn test_auth_only() {
        assert_eq!(evaluate(AuthOnly, Browser, None), Proceed);
        assert_eq!(evaluate(AuthOnly, Browser, Some(UserRole::User)), RedirectHome);
        assert_eq!(evaluate(AuthOnly, Api, Some(UserRole::Admin)), RedirectHome);
    }

    #[test]
    fn test_protected_anonymous_depends_on_transport() {
        assert_eq!(evaluate(Protected, Browser, None), RedirectToLogin);
        assert_eq!(evaluate(Protected, Api, None), Unauthorized);
        assert_eq!(evaluate(Protected, Api, Some(UserRole::User)), Proceed);
    }

    #[test]
    fn test_admin_only() {
        assert_eq!(evaluate(AdminOnly, Api, None), Unauthorized);
        assert_eq!(evaluate(AdminOnly, Browser, None), RedirectToLogin);
        assert_eq!(evaluate(AdminOnly, Api, Some(UserRole::User)), Forbidden);
        assert_eq!(evaluate(AdminOnly, Api, Some(UserRole::Moderator)), Forbidden);
        assert_eq!(evaluate(AdminOnly, Api, Some(UserRole::Admin)), Proceed);
    }
}
