//! End-to-end tests for the transaction coordinator over in-memory stores.

use std::sync::Arc;

use coinbox_change::Denomination;
use coinbox_core::{AccountId, DomainError, ProductId};
use coinbox_inventory::{InMemoryProductStore, Inventory, ProductUpdate};
use coinbox_ledger::{AccountLedger, InMemoryAccountStore};
use coinbox_vending::TransactionCoordinator;

type Coordinator = TransactionCoordinator<InMemoryAccountStore, InMemoryProductStore>;

fn coordinator() -> Coordinator {
    coinbox_observability::init();
    let ledger = AccountLedger::new(Arc::new(InMemoryAccountStore::new()));
    let inventory = Inventory::new(Arc::new(InMemoryProductStore::new()));
    TransactionCoordinator::new(ledger, inventory)
}

fn funded_buyer(coordinator: &Coordinator, coins: &[i64]) -> AccountId {
    let buyer = coordinator.open_account().unwrap().id;
    for &coin in coins {
        coordinator.deposit(buyer, coin).unwrap();
    }
    buyer
}

#[test]
fn deposit_accumulates_fixed_denominations() {
    let c = coordinator();
    let buyer = c.open_account().unwrap().id;

    assert_eq!(c.deposit(buyer, 5).unwrap(), 5);
    assert_eq!(c.deposit(buyer, 100).unwrap(), 105);
    assert_eq!(c.balance(buyer).unwrap(), 105);
}

#[test]
fn deposit_outside_the_coin_set_fails_and_changes_nothing() {
    let c = coordinator();
    let buyer = c.open_account().unwrap().id;

    assert_eq!(c.deposit(buyer, 7).unwrap_err(), DomainError::InvalidDenomination(7));
    assert_eq!(c.balance(buyer).unwrap(), 0);
}

#[test]
fn deposit_to_unknown_account_is_not_found() {
    let c = coordinator();
    assert_eq!(c.deposit(AccountId::new(), 5).unwrap_err(), DomainError::NotFound);
}

#[test]
fn buy_debits_balance_decrements_stock_and_issues_a_receipt() {
    // cost 12, stock 5, balance 15: one unit leaves balance 3, stock 4.
    let c = coordinator();
    let seller = c.open_account().unwrap().id;
    let product = c.create_product(seller, "Cola", 12, 5).unwrap();
    let buyer = funded_buyer(&c, &[5, 10]);

    let receipt = c.buy(buyer, product.id, 1).unwrap();
    assert_eq!(receipt.product_name, "Cola");
    assert_eq!(receipt.quantity, 1);
    assert_eq!(receipt.total_price, 12);
    assert_eq!(receipt.change_amount, 0); // balance 3 rounds down to 0

    assert_eq!(c.balance(buyer).unwrap(), 3);
    assert_eq!(c.get_product(product.id).unwrap().stock, 4);
}

#[test]
fn buy_rejects_non_positive_quantities() {
    let c = coordinator();
    let seller = c.open_account().unwrap().id;
    let product = c.create_product(seller, "Cola", 12, 5).unwrap();
    let buyer = funded_buyer(&c, &[100]);

    assert_eq!(c.buy(buyer, product.id, 0).unwrap_err(), DomainError::InvalidQuantity(0));
    assert_eq!(c.buy(buyer, product.id, -2).unwrap_err(), DomainError::InvalidQuantity(-2));
    assert_eq!(c.balance(buyer).unwrap(), 100);
    assert_eq!(c.get_product(product.id).unwrap().stock, 5);
}

#[test]
fn buy_beyond_stock_leaves_both_resources_untouched() {
    let c = coordinator();
    let seller = c.open_account().unwrap().id;
    let product = c.create_product(seller, "Cola", 12, 2).unwrap();
    let buyer = funded_buyer(&c, &[100]);

    let err = c.buy(buyer, product.id, 3).unwrap_err();
    assert_eq!(
        err,
        DomainError::InsufficientStock {
            available: 2,
            requested: 3
        }
    );
    assert_eq!(c.balance(buyer).unwrap(), 100);
    assert_eq!(c.get_product(product.id).unwrap().stock, 2);
}

#[test]
fn buy_without_funds_rolls_the_reservation_back() {
    let c = coordinator();
    let seller = c.open_account().unwrap().id;
    let product = c.create_product(seller, "Cola", 50, 5).unwrap();
    let buyer = funded_buyer(&c, &[20]);

    let err = c.buy(buyer, product.id, 2).unwrap_err();
    assert_eq!(
        err,
        DomainError::InsufficientFunds {
            balance: 20,
            required: 100
        }
    );
    // All-or-nothing: the stock decrement was undone.
    assert_eq!(c.get_product(product.id).unwrap().stock, 5);
    assert_eq!(c.balance(buyer).unwrap(), 20);
}

#[test]
fn buy_of_unknown_product_never_touches_the_balance() {
    let c = coordinator();
    let buyer = funded_buyer(&c, &[50]);

    assert_eq!(c.buy(buyer, ProductId::new(), 1).unwrap_err(), DomainError::NotFound);
    assert_eq!(c.balance(buyer).unwrap(), 50);
}

#[test]
fn change_figure_is_informational_and_repeats_without_leaving_the_ledger() {
    let c = coordinator();
    let seller = c.open_account().unwrap().id;
    let product = c.create_product(seller, "Gum", 5, 10).unwrap();
    let buyer = funded_buyer(&c, &[100, 20, 5]);

    let first = c.buy(buyer, product.id, 1).unwrap();
    assert_eq!(first.change_amount, 120);
    assert_eq!(c.balance(buyer).unwrap(), 120);

    // The reported change was not deducted, so the next receipt reports a
    // figure again, off the still-funded balance.
    let second = c.buy(buyer, product.id, 1).unwrap();
    assert_eq!(second.change_amount, 115);
    assert_eq!(c.balance(buyer).unwrap(), 115);
}

#[test]
fn reset_returns_the_full_denomination_map_and_zeroes_the_balance() {
    let c = coordinator();
    let buyer = funded_buyer(&c, &[100, 20, 10, 5]); // 135

    let coins = c.reset(buyer).unwrap();
    assert_eq!(coins.count(Denomination::Hundred), 1);
    assert_eq!(coins.count(Denomination::Fifty), 0);
    assert_eq!(coins.count(Denomination::Twenty), 1);
    assert_eq!(coins.count(Denomination::Ten), 0);
    assert_eq!(coins.count(Denomination::Five), 1);
    assert_eq!(coins.total(), 135);
    assert_eq!(c.balance(buyer).unwrap(), 0);
}

#[test]
fn reset_of_an_empty_account_returns_all_zero_counts() {
    let c = coordinator();
    let buyer = c.open_account().unwrap().id;

    let coins = c.reset(buyer).unwrap();
    assert_eq!(coins.total(), 0);
    assert_eq!(coins.coin_count(), 0);
}

#[test]
fn reset_surfaces_a_balance_the_coin_set_cannot_express() {
    // cost 12 leaves a sub-coin residue of 3 on a 15 balance.
    let c = coordinator();
    let seller = c.open_account().unwrap().id;
    let product = c.create_product(seller, "Cola", 12, 5).unwrap();
    let buyer = funded_buyer(&c, &[5, 10]);
    c.buy(buyer, product.id, 1).unwrap();

    let err = c.reset(buyer).unwrap_err();
    match err {
        DomainError::InvariantViolation(msg) => assert!(msg.contains("3")),
        other => panic!("expected InvariantViolation, got {other:?}"),
    }
}

#[test]
fn listing_mutation_goes_through_the_ownership_guard() {
    let c = coordinator();
    let seller = c.open_account().unwrap().id;
    let intruder = c.open_account().unwrap().id;
    let product = c.create_product(seller, "Cola", 12, 5).unwrap();

    let fields = ProductUpdate {
        name: "Hijacked".to_string(),
        unit_cost: 1,
        stock: 1,
    };
    assert_eq!(
        c.update_product(product.id, intruder, fields).unwrap_err(),
        DomainError::Unauthorized
    );
    assert_eq!(
        c.delete_product(product.id, intruder).unwrap_err(),
        DomainError::Unauthorized
    );
    // And NotFound wins over Unauthorized for absent ids.
    assert_eq!(
        c.delete_product(ProductId::new(), intruder).unwrap_err(),
        DomainError::NotFound
    );
}

#[test]
fn closing_an_account_cascades_to_its_listings() {
    let c = coordinator();
    let seller = c.open_account().unwrap().id;
    let other = c.open_account().unwrap().id;
    c.create_product(seller, "Cola", 12, 5).unwrap();
    c.create_product(seller, "Gum", 5, 3).unwrap();
    let kept = c.create_product(other, "Chips", 20, 1).unwrap();

    assert_eq!(c.close_account(seller).unwrap(), 2);
    assert_eq!(c.balance(seller).unwrap_err(), DomainError::NotFound);

    let remaining = c.list_products().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
}

#[test]
fn concurrent_buyers_cannot_oversell_a_single_unit() {
    let c = Arc::new(coordinator());
    let seller = c.open_account().unwrap().id;
    let product = c.create_product(seller, "Last One", 5, 1).unwrap();

    let buyers: Vec<AccountId> = (0..8).map(|_| funded_buyer(&c, &[100])).collect();

    let handles: Vec<_> = buyers
        .into_iter()
        .map(|buyer| {
            let c = c.clone();
            let product_id = product.id;
            std::thread::spawn(move || c.buy(buyer, product_id, 1))
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(receipt) => {
                successes += 1;
                assert_eq!(receipt.total_price, 5);
            }
            Err(DomainError::InsufficientStock { available, requested }) => {
                assert_eq!(available, 0);
                assert_eq!(requested, 1);
            }
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(c.get_product(product.id).unwrap().stock, 0);
}

#[test]
fn concurrent_deposits_and_purchases_conserve_money() {
    let c = Arc::new(coordinator());
    let seller = c.open_account().unwrap().id;
    let product = c.create_product(seller, "Cola", 10, 1_000).unwrap();
    let buyer = funded_buyer(&c, &[100, 100]); // 200

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let c = c.clone();
            let product_id = product.id;
            std::thread::spawn(move || {
                for _ in 0..10 {
                    if i % 2 == 0 {
                        c.deposit(buyer, 10).unwrap();
                    } else {
                        let _ = c.buy(buyer, product_id, 1);
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let sold = 1_000 - c.get_product(product.id).unwrap().stock;
    let deposited = 200 + 2 * 10 * 10; // initial + two depositor threads
    // Every unit sold cost 10; whatever was not spent is still on the balance.
    assert_eq!(c.balance(buyer).unwrap(), deposited - sold * 10);
}
