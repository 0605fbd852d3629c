#![cfg(test)]
use soroban_sdk::{testutils::Address as _, vec, Address};

use crate::test::{
    compensation_events, set_time, setup_sale_with, Sale, CROWDSALE_PRICE, FIAT_PER_NATIVE,
    ONE_NATIVE, PRESALE_PRICE, TEST_LOCKED_TIME,
};
use crate::SettlementError;

fn sale_with_contributor() -> (Sale, Address) {
    let sale = setup_sale_with(PRESALE_PRICE, FIAT_PER_NATIVE, TEST_LOCKED_TIME);
    let contributor = Address::generate(&sale.env);
    sale.presale.set_contribution(&contributor, &ONE_NATIVE);
    (sale, contributor)
}

#[test]
fn compensate_can_only_be_called_by_the_owner() {
    let (sale, contributor1) = sale_with_contributor();
    sale.env.mock_all_auths();
    let contributor2 = Address::generate(&sale.env);
    let non_contributor = Address::generate(&sale.env);

    for caller in [&contributor1, &contributor2, &non_contributor, &sale.price_setter] {
        let result = sale
            .client
            .try_compensate(caller, &vec![&sale.env, contributor1.clone()]);
        assert_eq!(result, Err(Ok(SettlementError::NotAuthorized)));
    }
    assert!(!sale.client.is_compensated(&contributor1));
    assert_eq!(sale.token.balance(&contributor1), 0);
    assert_eq!(compensation_events(&sale), 0);
}

#[test]
fn compensate_missing_auth_no_mutation() {
    let (sale, contributor) = sale_with_contributor();
    assert!(sale
        .client
        .try_compensate(&sale.owner, &vec![&sale.env, contributor.clone()])
        .is_err());
    assert!(!sale.client.is_compensated(&contributor));
    assert_eq!(sale.client.get_compensated_count(), 0);
}

#[test]
fn set_price_wrong_caller_no_mutation() {
    let (sale, _) = sale_with_contributor();
    sale.env.mock_all_auths();
    let attacker = Address::generate(&sale.env);

    for caller in [&attacker, &sale.owner] {
        let result = sale.client.try_set_fiat_per_native_unit(caller, &460);
        assert_eq!(result, Err(Ok(SettlementError::NotAuthorized)));
    }
    assert_eq!(
        sale.client.get_rate_config().unwrap().fiat_per_native_unit,
        FIAT_PER_NATIVE
    );
}

#[test]
fn set_price_wrong_caller_after_lock_is_still_unauthorized() {
    let (sale, _) = sale_with_contributor();
    sale.env.mock_all_auths();
    set_time(&sale.env, TEST_LOCKED_TIME + 1);
    let attacker = Address::generate(&sale.env);
    let result = sale.client.try_set_fiat_per_native_unit(&attacker, &460);
    assert_eq!(result, Err(Ok(SettlementError::NotAuthorized)));
}

#[test]
fn set_price_missing_auth_no_mutation() {
    let (sale, _) = sale_with_contributor();
    assert!(sale
        .client
        .try_set_fiat_per_native_unit(&sale.price_setter, &460)
        .is_err());
    assert_eq!(
        sale.client.get_rate_config().unwrap().fiat_per_native_unit,
        FIAT_PER_NATIVE
    );
}

#[test]
fn transfer_ownership_moves_compensation_rights() {
    let (sale, contributor) = sale_with_contributor();
    sale.env.mock_all_auths();
    let new_owner = Address::generate(&sale.env);

    sale.client.transfer_ownership(&sale.owner, &new_owner);
    assert_eq!(sale.client.get_owner(), Some(new_owner.clone()));

    let batch = vec![&sale.env, contributor.clone()];
    assert_eq!(
        sale.client.try_compensate(&sale.owner, &batch),
        Err(Ok(SettlementError::NotAuthorized))
    );
    let summary = sale.client.compensate(&new_owner, &batch);
    assert_eq!(summary.settled, 1);
}

#[test]
fn transfer_ownership_wrong_caller_no_mutation() {
    let (sale, _) = sale_with_contributor();
    sale.env.mock_all_auths();
    let attacker = Address::generate(&sale.env);
    assert_eq!(
        sale.client.try_transfer_ownership(&attacker, &attacker),
        Err(Ok(SettlementError::NotAuthorized))
    );
    assert_eq!(sale.client.get_owner(), Some(sale.owner.clone()));
}

#[test]
fn transfer_ownership_missing_auth() {
    let (sale, _) = sale_with_contributor();
    let new_owner = Address::generate(&sale.env);
    assert!(sale
        .client
        .try_transfer_ownership(&sale.owner, &new_owner)
        .is_err());
    assert_eq!(sale.client.get_owner(), Some(sale.owner.clone()));
}

#[test]
fn set_price_setter_hands_over_price_updates() {
    let sale = setup_sale_with(CROWDSALE_PRICE, 355, TEST_LOCKED_TIME);
    sale.env.mock_all_auths();
    let new_setter = Address::generate(&sale.env);

    sale.client.set_price_setter(&sale.owner, &new_setter);

    assert_eq!(sale.client.get_price_setter(), Some(new_setter.clone()));
    assert_eq!(
        sale.client
            .try_set_fiat_per_native_unit(&sale.price_setter, &460),
        Err(Ok(SettlementError::NotAuthorized))
    );
    sale.client.set_fiat_per_native_unit(&new_setter, &460);
    assert_eq!(sale.client.get_rate_config().unwrap().fiat_per_native_unit, 460);
}

#[test]
fn set_price_setter_wrong_caller_no_mutation() {
    let (sale, _) = sale_with_contributor();
    sale.env.mock_all_auths();
    let attacker = Address::generate(&sale.env);
    assert_eq!(
        sale.client.try_set_price_setter(&sale.price_setter, &attacker),
        Err(Ok(SettlementError::NotAuthorized))
    );
    assert_eq!(sale.client.get_price_setter(), Some(sale.price_setter.clone()));
}
