//! Static per-operation access rules.

use std::fmt;

use crate::claims::Principal;
use crate::error::AuthError;
use crate::role::Role;

/// The set of roles allowed to perform an operation. An empty rule admits
/// any authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessRule {
    admin: bool,
    instructor: bool,
    student: bool,
}

impl AccessRule {
    pub const ANY_AUTHENTICATED: AccessRule = AccessRule::new(&[]);
    pub const ADMIN_ONLY: AccessRule = AccessRule::new(&[Role::Admin]);
    pub const INSTRUCTOR_ONLY: AccessRule = AccessRule::new(&[Role::Instructor]);
    pub const STUDENT_ONLY: AccessRule = AccessRule::new(&[Role::Student]);
    pub const INSTRUCTOR_OR_ADMIN: AccessRule = AccessRule::new(&[Role::Instructor, Role::Admin]);
    pub const ALL_ROLES: AccessRule =
        AccessRule::new(&[Role::Student, Role::Instructor, Role::Admin]);

    pub const fn new(roles: &[Role]) -> Self {
        let mut rule = AccessRule {
            admin: false,
            instructor: false,
            student: false,
        };
        let mut i = 0;
        while i < roles.len() {
            match roles[i] {
                Role::Admin => rule.admin = true,
                Role::Instructor => rule.instructor = true,
                Role::Student => rule.student = true,
            }
            i += 1;
        }
        rule
    }

    pub const fn any_authenticated() -> Self {
        Self::ANY_AUTHENTICATED
    }

    pub const fn is_empty(&self) -> bool {
        !(self.admin || self.instructor || self.student)
    }

    pub const fn permits(&self, role: Role) -> bool {
        if self.is_empty() {
            return true;
        }
        match role {
            Role::Admin => self.admin,
            Role::Instructor => self.instructor,
            Role::Student => self.student,
        }
    }

    pub fn roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| !self.is_empty() && self.permits(*role))
            .collect()
    }
}

impl fmt::Display for AccessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("any authenticated");
        }
        let names: Vec<&str> = self.roles().into_iter().map(Role::as_str).collect();
        f.write_str(&names.join("|"))
    }
}

/// Permits `principal` when its role is in `rule`.
pub fn authorize(principal: &Principal, rule: AccessRule) -> Result<(), AuthError> {
    if rule.permits(principal.role) {
        Ok(())
    } else {
        Err(AuthError::insufficient_permissions())
    }
}
