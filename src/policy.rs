//! Role and ownership rules gating mutations.

use uuid::Uuid;

use crate::{error::AppError, middleware::auth::AuthUser, models::Role};

pub fn can_mutate_stadium(actor: &AuthUser) -> bool {
    actor.role == Role::Admin
}

pub fn can_view_all_bookings(actor: &AuthUser) -> bool {
    actor.role == Role::Admin
}

pub fn can_cancel(actor: &AuthUser, booking_owner: Uuid) -> bool {
    actor.user_id == booking_owner || actor.role == Role::Admin
}

pub fn ensure(allowed: bool) -> Result<(), AppError> {
    if allowed { Ok(()) } else { Err(AppError::Forbidden) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn only_admins_mutate_stadiums_and_see_all_bookings() {
        assert!(can_mutate_stadium(&actor(Role::Admin)));
        assert!(!can_mutate_stadium(&actor(Role::User)));
        assert!(can_view_all_bookings(&actor(Role::Admin)));
        assert!(!can_view_all_bookings(&actor(Role::User)));
    }

    #[test]
    fn owner_or_admin_can_cancel() {
        let owner = actor(Role::User);
        let stranger = actor(Role::User);
        let admin = actor(Role::Admin);

        assert!(can_cancel(&owner, owner.user_id));
        assert!(!can_cancel(&stranger, owner.user_id));
        assert!(can_cancel(&admin, owner.user_id));
    }

    #[test]
    fn ensure_maps_denial_to_forbidden() {
        assert!(ensure(true).is_ok());
        assert!(matches!(ensure(false), Err(AppError::Forbidden)));
    }
}
