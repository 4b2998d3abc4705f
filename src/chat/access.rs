use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::types::{Role, Table};

/// Static role -> readable tables mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessPolicy {
    roles: HashMap<Role, BTreeSet<Table>>,
}

impl AccessPolicy {
    pub fn new(roles: HashMap<Role, BTreeSet<Table>>) -> Self {
        Self { roles }
    }

    pub fn allowed(&self, role: Role) -> Option<&BTreeSet<Table>> {
        self.roles.get(&role)
    }

    /// Intersection of `candidates` with the tables `role` may read.
    /// A role without an entry gets nothing.
    pub fn authorize(&self, role: Role, candidates: &BTreeSet<Table>) -> BTreeSet<Table> {
        match self.roles.get(&role) {
            Some(allowed) => candidates.intersection(allowed).copied().collect(),
            None => BTreeSet::new(),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        let guest: BTreeSet<Table> = [Table::Lecturers, Table::News].into_iter().collect();

        let mut admin = guest.clone();
        admin.extend([Table::Enterprises, Table::PeriodEnterprises, Table::StudentDocuments]);

        // Only students read `students`, and only their own row.
        let mut student = admin.clone();
        student.insert(Table::Students);

        let mut roles = HashMap::new();
        roles.insert(Role::Guest, guest);
        roles.insert(Role::Student, student);
        roles.insert(Role::Admin, admin);
        Self { roles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tables: &[Table]) -> BTreeSet<Table> {
        tables.iter().copied().collect()
    }

    #[test]
    fn result_is_the_intersection_with_role_policy() {
        let policy = AccessPolicy::default();
        let candidates = set(&[Table::Lecturers, Table::Enterprises, Table::Students]);

        assert_eq!(policy.authorize(Role::Guest, &candidates), set(&[Table::Lecturers]));
        assert_eq!(policy.authorize(Role::Student, &candidates), candidates);
        assert_eq!(
            policy.authorize(Role::Admin, &candidates),
            set(&[Table::Lecturers, Table::Enterprises])
        );
    }

    #[test]
    fn default_role_sets_are_exact() {
        let policy = AccessPolicy::default();
        let everything: BTreeSet<Table> = Table::ALL.into_iter().collect();

        assert_eq!(policy.authorize(Role::Guest, &everything), set(&[Table::Lecturers, Table::News]));
        assert_eq!(
            policy.authorize(Role::Admin, &everything),
            set(&[
                Table::Lecturers,
                Table::News,
                Table::Enterprises,
                Table::PeriodEnterprises,
                Table::StudentDocuments,
            ])
        );
        assert_eq!(
            policy.authorize(Role::Student, &everything),
            set(&[
                Table::Lecturers,
                Table::News,
                Table::Enterprises,
                Table::PeriodEnterprises,
                Table::StudentDocuments,
                Table::Students,
            ])
        );
    }

    #[test]
    fn guest_gets_nothing_from_faq_or_event_questions() {
        let policy = AccessPolicy::default();
        let candidates = set(&[Table::Faq, Table::Events, Table::Majors, Table::Lecturers, Table::News]);
        assert_eq!(policy.authorize(Role::Guest, &candidates), set(&[Table::Lecturers, Table::News]));
        assert!(policy.authorize(Role::Admin, &set(&[Table::Students])).is_empty());
    }

    #[test]
    fn guest_never_leaves_its_fixed_list() {
        let policy = AccessPolicy::default();
        let everything: BTreeSet<Table> = Table::ALL.into_iter().collect();
        let granted = policy.authorize(Role::Guest, &everything);
        let guest_list = policy.allowed(Role::Guest).cloned().unwrap_or_default();

        assert!(granted.is_subset(&guest_list));
        assert!(!granted.contains(&Table::Students));
        assert!(!granted.contains(&Table::StudentDocuments));
    }

    #[test]
    fn unknown_role_gets_no_access() {
        let policy = AccessPolicy::default();
        let everything: BTreeSet<Table> = Table::ALL.into_iter().collect();
        assert!(policy.authorize(Role::Unknown, &everything).is_empty());
    }

    #[test]
    fn role_missing_from_policy_gets_no_access() {
        let mut roles = HashMap::new();
        roles.insert(Role::Admin, set(&[Table::News]));
        let policy = AccessPolicy::new(roles);
        assert!(policy.authorize(Role::Guest, &set(&[Table::News])).is_empty());
        assert_eq!(policy.authorize(Role::Admin, &set(&[Table::News])), set(&[Table::News]));
    }

    #[test]
    fn empty_candidates_stay_empty() {
        let policy = AccessPolicy::default();
        assert!(policy.authorize(Role::Admin, &BTreeSet::new()).is_empty());
    }
}
