//! Stock specifications for the two aggregates.
//!
//! All of these are native-renderable; tests and callers with bespoke
//! predicates implement [`Specification`] directly and rely on the
//! fallback scan.

use uuid::Uuid;

use crate::domain::models::{Order, OrderStatus, Role, User, UserStatus};
use crate::domain::ports::specification::{NativeClause, Specification};

/// Orders in a given lifecycle status.
#[derive(Debug, Clone, Copy)]
pub struct OrderWithStatus(pub OrderStatus);

impl Specification<Order> for OrderWithStatus {
    fn is_satisfied_by(&self, candidate: &Order) -> bool {
        candidate.status == self.0
    }

    fn native_clause(&self) -> Option<NativeClause> {
        Some(NativeClause::new("status = ?", vec![self.0.as_str().to_string()]))
    }
}

/// Orders belonging to a customer code.
#[derive(Debug, Clone)]
pub struct OrderForCustomer(pub String);

impl Specification<Order> for OrderForCustomer {
    fn is_satisfied_by(&self, candidate: &Order) -> bool {
        candidate.customer.id == self.0
    }

    fn native_clause(&self) -> Option<NativeClause> {
        Some(NativeClause::new("customer_id = ?", vec![self.0.clone()]))
    }
}

/// Orders assigned to a given user.
#[derive(Debug, Clone, Copy)]
pub struct OrderAssignedTo(pub Uuid);

impl Specification<Order> for OrderAssignedTo {
    fn is_satisfied_by(&self, candidate: &Order) -> bool {
        candidate.assigned_to.as_ref().is_some_and(|user| user.id == self.0)
    }

    fn native_clause(&self) -> Option<NativeClause> {
        Some(NativeClause::new("assigned_to = ?", vec![self.0.to_string()]))
    }
}

/// Users in a given account status.
#[derive(Debug, Clone, Copy)]
pub struct UserWithStatus(pub UserStatus);

impl Specification<User> for UserWithStatus {
    fn is_satisfied_by(&self, candidate: &User) -> bool {
        candidate.status == self.0
    }

    fn native_clause(&self) -> Option<NativeClause> {
        Some(NativeClause::new("status = ?", vec![self.0.as_str().to_string()]))
    }
}

/// Users holding a given role.
#[derive(Debug, Clone, Copy)]
pub struct UserWithRole(pub Role);

impl Specification<User> for UserWithRole {
    fn is_satisfied_by(&self, candidate: &User) -> bool {
        candidate.has_role(self.0)
    }

    fn native_clause(&self) -> Option<NativeClause> {
        Some(NativeClause::new(
            "user_id IN (SELECT user_id FROM user_roles WHERE role = ?)",
            vec![self.0.as_str().to_string()],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CustomerRef, UserRef};

    fn order() -> Order {
        Order::new(
            CustomerRef::new("ACME", "Acme Corp"),
            "Widget",
            "1 Factory Rd",
            UserRef::placeholder(Uuid::new_v4()),
        )
    }

    #[test]
    fn status_spec_agrees_with_native_clause() {
        let spec = OrderWithStatus(OrderStatus::Pending);
        assert!(spec.is_satisfied_by(&order()));
        let clause = spec.native_clause().expect("native");
        assert_eq!(clause.where_sql, "status = ?");
        assert_eq!(clause.params, vec!["pending".to_string()]);
    }

    #[test]
    fn customer_spec_matches_code() {
        let spec = OrderForCustomer("ACME".to_string());
        assert!(spec.is_satisfied_by(&order()));
        assert!(!OrderForCustomer("OTHER".to_string()).is_satisfied_by(&order()));
    }

    #[test]
    fn assignee_spec_handles_unassigned() {
        let user = Uuid::new_v4();
        let mut candidate = order();
        assert!(!OrderAssignedTo(user).is_satisfied_by(&candidate));
        candidate.assigned_to = Some(UserRef::placeholder(user));
        assert!(OrderAssignedTo(user).is_satisfied_by(&candidate));
    }

    #[test]
    fn role_spec_uses_membership_subquery() {
        let mut user = User::new("jdoe", "hash", "jdoe@example.com");
        let spec = UserWithRole(Role::Inspector);
        assert!(!spec.is_satisfied_by(&user));
        user.grant_role(Role::Inspector);
        assert!(spec.is_satisfied_by(&user));
        let clause = spec.native_clause().expect("native");
        assert!(clause.where_sql.contains("user_roles"));
    }
}
