//! Seeder population counts, ledger consistency and determinism.

use bank_core::{
    config::SeedConfig,
    seeder::{SeedReport, Seeder},
    BankStore,
};

fn store() -> BankStore {
    let _ = env_logger::builder().is_test(true).try_init();
    BankStore::in_memory().expect("in-memory store")
}

fn seed(store: &BankStore, config: SeedConfig, seed: u64) -> SeedReport {
    Seeder::new(store, config, seed).run().expect("seeding failed")
}

#[test]
fn seeding_produces_configured_population() {
    let store = store();
    let config = SeedConfig::default_test();
    let report = seed(&store, config.clone(), 42);

    assert_eq!(report.customers, config.customers);
    assert_eq!(store.customer_count().unwrap(), i64::from(config.customers));

    let min = config.customers * config.min_accounts_per_customer;
    let max = config.customers * config.max_accounts_per_customer;
    assert!(
        (min..=max).contains(&report.accounts),
        "accounts {} outside [{min}, {max}]",
        report.accounts
    );
    assert_eq!(store.account_count().unwrap(), i64::from(report.accounts));

    assert_eq!(
        report.entries + report.transfers + report.rejected,
        config.transactions
    );
    // A transfer writes two rows.
    assert_eq!(
        store.transaction_count().unwrap(),
        i64::from(report.entries + 2 * report.transfers)
    );
}

#[test]
fn every_customer_has_between_one_and_three_accounts() {
    let store = store();
    let report = seed(&store, SeedConfig::default_test(), 7);

    for customer_id in 1..=i64::from(report.customers) {
        let accounts = store.get_accounts_by_customer(customer_id).unwrap();
        assert!(
            (1..=3).contains(&accounts.len()),
            "customer {customer_id} has {} accounts",
            accounts.len()
        );
        for account in accounts {
            assert_eq!(account.account_number.len(), 10);
        }
    }
}

#[test]
fn seeded_ledger_reconciles() {
    let store = store();
    seed(&store, SeedConfig::default_test(), 1234);

    let checks = store.reconcile_all().unwrap();
    assert!(!checks.is_empty());
    for check in checks {
        assert!(check.balanced, "account {} out of balance: {check:?}", check.account_id);
        assert_eq!(
            check.expected_balance, check.actual_balance,
            "account {}",
            check.account_id
        );
    }
}

#[test]
fn default_configuration_seeds_full_data_set() {
    let store = store();
    let report = seed(&store, SeedConfig::default(), 2024);

    assert_eq!(report.customers, 25);
    assert!((25..=75).contains(&report.accounts));
    assert_eq!(report.entries + report.transfers + report.rejected, 500);
    assert!(report.transfers > 0, "expected some transfers: {report:?}");
    assert!(report.entries > report.transfers, "{report:?}");
}

#[test]
fn same_seed_same_data() {
    let store_a = store();
    let store_b = store();
    let report_a = seed(&store_a, SeedConfig::default_test(), 0xFEED_BEEF);
    let report_b = seed(&store_b, SeedConfig::default_test(), 0xFEED_BEEF);

    assert_eq!(report_a, report_b);
    for customer_id in 1..=i64::from(report_a.customers) {
        assert_eq!(
            store_a.get_customer(customer_id).unwrap(),
            store_b.get_customer(customer_id).unwrap()
        );
    }
    assert_eq!(
        store_a.reconcile_all().unwrap(),
        store_b.reconcile_all().unwrap()
    );
}

#[test]
fn reseeding_the_same_store_does_not_collide() {
    let store = store();
    let config = SeedConfig::default_test();
    seed(&store, config.clone(), 5);
    seed(&store, config.clone(), 5);

    assert_eq!(
        store.customer_count().unwrap(),
        i64::from(2 * config.customers)
    );
}

#[test]
fn invalid_configuration_is_refused() {
    let store = store();
    let config = SeedConfig {
        transfer_share: 1.5,
        ..SeedConfig::default_test()
    };
    assert!(Seeder::new(&store, config, 1).run().is_err());
    assert_eq!(store.customer_count().unwrap(), 0);
}
