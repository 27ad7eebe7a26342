//! Cache of reference projections, shared across repositories via `Arc`.
//!
//! References are treated as slowly changing: entries are created on the
//! first successful resolution of a foreign id and are never invalidated
//! except by process restart. Failed resolutions are not cached so a later
//! lookup can still succeed.

use uuid::Uuid;

use crate::domain::models::{CustomerRef, UserRef};

use super::bounded::BoundedCache;

/// Key to projection cache for user and customer references.
#[derive(Debug)]
pub struct ReferenceCache {
    users: BoundedCache<Uuid, UserRef>,
    customers: BoundedCache<String, CustomerRef>,
}

impl ReferenceCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            users: BoundedCache::new(capacity),
            customers: BoundedCache::new(capacity),
        }
    }

    pub fn get_user(&self, id: Uuid) -> Option<UserRef> {
        self.users.get(&id)
    }

    pub fn put_user(&self, user: UserRef) {
        self.users.put(user.id, user);
    }

    pub fn get_customer(&self, code: &str) -> Option<CustomerRef> {
        self.customers.get(&code.to_string())
    }

    pub fn put_customer(&self, customer: CustomerRef) {
        self.customers.put(customer.id.clone(), customer);
    }
}

impl Default for ReferenceCache {
    fn default() -> Self {
        Self::new(crate::domain::models::CacheSettings::default().reference_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_user_and_customer_projections() {
        let cache = ReferenceCache::new(4);
        let id = Uuid::new_v4();
        assert!(cache.get_user(id).is_none());
        cache.put_user(UserRef::new(id, "Jane Doe"));
        assert_eq!(cache.get_user(id).map(|u| u.display_name), Some("Jane Doe".to_string()));

        assert!(cache.get_customer("ACME").is_none());
        cache.put_customer(CustomerRef::new("ACME", "Acme Corp"));
        assert_eq!(
            cache.get_customer("ACME").map(|c| c.display_name),
            Some("Acme Corp".to_string())
        );
    }
}
