//! Per-user reservation quota.

/// Most reservations a non-admin user may hold at once.
pub const RESERVATION_QUOTA: usize = 3;

/// Whether a user holding `existing_count` reservations may make another.
///
/// Admins are never limited.
pub fn is_under_quota(existing_count: usize, is_admin: bool) -> bool {
    is_admin || existing_count < RESERVATION_QUOTA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_limited_at_quota() {
        assert!(is_under_quota(0, false));
        assert!(is_under_quota(2, false));
        assert!(!is_under_quota(3, false));
        assert!(!is_under_quota(10, false));
    }

    #[test]
    fn test_admin_unlimited() {
        for n in [0, 3, 1000] {
            assert!(is_under_quota(n, true));
        }
    }
}
