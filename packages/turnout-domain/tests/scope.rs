use std::collections::BTreeSet;

use turnout_domain::scope::{AccessScope, Principal};

fn grants(values: &[&str]) -> BTreeSet<String> {
	values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn privileged_principal_is_unrestricted_regardless_of_grants() {
	let admin = Principal { id: 1, is_privileged: true };

	assert_eq!(AccessScope::resolve(&admin, BTreeSet::new()), AccessScope::Unrestricted);
	assert_eq!(AccessScope::resolve(&admin, grants(&["Dane"])), AccessScope::Unrestricted);
}

#[test]
fn empty_grants_deny_everything() {
	let canvasser = Principal { id: 2, is_privileged: false };
	let scope = AccessScope::resolve(&canvasser, BTreeSet::new());

	assert!(scope.is_deny_all());
	assert_ne!(scope, AccessScope::Unrestricted);
	assert!(!scope.permits(Some("Dane")));
	assert!(!scope.permits(None));
	assert_eq!(scope.regions(), Some(Vec::new()));
}

#[test]
fn restricted_scope_permits_only_granted_regions() {
	let canvasser = Principal { id: 3, is_privileged: false };
	let scope = AccessScope::resolve(&canvasser, grants(&["Dane", "Iowa"]));

	assert!(!scope.is_deny_all());
	assert!(scope.permits(Some("Dane")));
	assert!(scope.permits(Some("Iowa")));
	assert!(!scope.permits(Some("Sauk")));
	assert!(!scope.permits(None));
	assert_eq!(scope.regions(), Some(vec!["Dane".to_string(), "Iowa".to_string()]));
}

#[test]
fn unrestricted_scope_permits_records_without_region() {
	assert!(AccessScope::Unrestricted.permits(None));
	assert!(!AccessScope::Unrestricted.is_deny_all());
	assert_eq!(AccessScope::Unrestricted.regions(), None);
}
