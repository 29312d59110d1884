//! Tests for the phone verification flow

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::account::{Account, TIER_DEFAULT};
use crate::domain::entities::contact::{Contact, ContactChannel};
use crate::errors::{ConflictError, CoreError, NotFoundError, ValidationError};
use crate::repositories::{
    AccountRepository, ContactRepository, MockAccountRepository, MockContactRepository,
    MockTokenRepository,
};
use crate::services::resolver::VerificationResolver;
use crate::services::verification::config::VerificationConfig;
use crate::services::verification::phone::PhoneVerificationService;
use crate::services::verification::traits::{provider_codes, ProviderStatus, SmsChannel};

use super::mocks::{RecordingDispatcher, StubSmsProvider};

const NUMBER: &str = "+436601234567";

type Service = PhoneVerificationService<
    MockAccountRepository,
    MockContactRepository,
    MockTokenRepository,
    RecordingDispatcher,
    StubSmsProvider,
>;

struct Fixture {
    accounts: Arc<MockAccountRepository>,
    contacts: Arc<MockContactRepository>,
    provider: Arc<StubSmsProvider>,
    service: Service,
}

fn fixture_with(provider: StubSmsProvider) -> Fixture {
    let accounts = Arc::new(MockAccountRepository::new());
    let contacts = Arc::new(MockContactRepository::new());
    let tokens = Arc::new(MockTokenRepository::new());
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let provider = Arc::new(provider);

    let resolver = Arc::new(VerificationResolver::new(
        accounts.clone(),
        contacts.clone(),
        tokens,
        dispatcher,
    ));
    let service = PhoneVerificationService::new(
        accounts.clone(),
        contacts.clone(),
        resolver,
        provider.clone(),
        VerificationConfig::default(),
    );

    Fixture {
        accounts,
        contacts,
        provider,
        service,
    }
}

fn fixture() -> Fixture {
    fixture_with(StubSmsProvider::approving())
}

async fn make_account(f: &Fixture, username: &str) -> Account {
    let account = Account::new(username.to_string(), "hash".to_string(), TIER_DEFAULT);
    f.accounts.create(account).await.unwrap()
}

#[tokio::test]
async fn test_request_creates_claim_and_sends() {
    let f = fixture();
    let account = make_account(&f, "x").await;

    let result = f
        .service
        .request(&account, "+43 660 1234567", SmsChannel::Sms)
        .await
        .unwrap();

    assert_eq!(result.contact.address, NUMBER);
    assert!(!result.contact.verified);

    let sends = f.provider.sends.lock().await;
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].0, NUMBER);
    assert_eq!(sends[0].1, SmsChannel::Sms);

    // The phone gate is armed for the full request window
    let stored = f.accounts.find_by_id(account.id).await.unwrap().unwrap();
    assert!(stored.next_phone_request.unwrap() > Utc::now() + Duration::seconds(100));
}

#[tokio::test]
async fn test_request_invalid_number_rejected() {
    let f = fixture();
    let account = make_account(&f, "x").await;

    let result = f.service.request(&account, "12345", SmsChannel::Sms).await;

    assert!(matches!(
        result,
        Err(CoreError::Validation(ValidationError::InvalidPhone { .. }))
    ));
    assert!(f.contacts.all().await.is_empty());
}

#[tokio::test]
async fn test_request_throttled_with_unverified_own_number() {
    let f = fixture();
    let account = make_account(&f, "x").await;

    f.service
        .request(&account, NUMBER, SmsChannel::Sms)
        .await
        .unwrap();

    let stored = f.accounts.find_by_id(account.id).await.unwrap().unwrap();
    let result = f.service.request(&stored, NUMBER, SmsChannel::Sms).await;

    // Inside the window the caller is told to reuse the code or wait
    assert!(matches!(result, Err(CoreError::Throttled { .. })));
    let sends = f.provider.sends.lock().await;
    assert_eq!(sends.len(), 1);
}

#[tokio::test]
async fn test_request_number_verified_elsewhere_conflicts_and_arms_short_gate() {
    let f = fixture();
    let owner = make_account(&f, "x").await;
    let requester = make_account(&f, "y").await;

    let mut verified = Contact::new(owner.id, ContactChannel::Phone, NUMBER.to_string(), true);
    verified.verified = true;
    f.contacts.insert(verified).await;

    let result = f.service.request(&requester, NUMBER, SmsChannel::Sms).await;

    assert!(matches!(
        result,
        Err(CoreError::Conflict(ConflictError::VerifiedOnOtherAccount))
    ));

    let stored = f.accounts.find_by_id(requester.id).await.unwrap().unwrap();
    let deadline = stored.next_phone_request.unwrap();
    assert!(deadline > Utc::now());
    assert!(deadline <= Utc::now() + Duration::seconds(21));
}

#[tokio::test]
async fn test_request_send_failure_surfaces_provider_code() {
    let f = fixture_with(StubSmsProvider::approving().with_send(Ok(ProviderStatus::Failed {
        code: provider_codes::MAX_SEND_ATTEMPTS,
    })));
    let account = make_account(&f, "x").await;

    let result = f.service.request(&account, NUMBER, SmsChannel::Call).await;

    match result {
        Err(CoreError::Upstream { code, .. }) => {
            assert_eq!(code, provider_codes::MAX_SEND_ATTEMPTS);
        }
        other => panic!("expected upstream error, got {:?}", other),
    }

    // The claim exists and the gate is armed regardless of the send
    assert_eq!(f.contacts.all().await.len(), 1);
    let stored = f.accounts.find_by_id(account.id).await.unwrap().unwrap();
    assert!(stored.next_phone_request.is_some());
}

#[tokio::test]
async fn test_submit_approved_verifies_and_rearms() {
    let f = fixture();
    let account = make_account(&f, "x").await;

    let claim = Contact::new(account.id, ContactChannel::Phone, NUMBER.to_string(), false);
    f.contacts.insert(claim.clone()).await;

    let contact = f
        .service
        .submit(&account, NUMBER, "042137")
        .await
        .unwrap();

    assert!(contact.verified);
    assert!(contact.primary);

    // Code-check gate armed, and the phone gate re-armed to the short
    // post-verification window
    let stored = f.accounts.find_by_id(account.id).await.unwrap().unwrap();
    assert!(stored.next_phone_code_request.is_some());
    let rearm = stored.next_phone_request.unwrap();
    assert!(rearm <= Utc::now() + Duration::seconds(6));
}

#[tokio::test]
async fn test_submit_pending_means_code_mismatch() {
    let f = fixture_with(StubSmsProvider::approving().with_check(Ok(ProviderStatus::Pending)));
    let account = make_account(&f, "x").await;

    let claim = Contact::new(account.id, ContactChannel::Phone, NUMBER.to_string(), false);
    f.contacts.insert(claim.clone()).await;

    let result = f.service.submit(&account, NUMBER, "042137").await;

    assert!(matches!(
        result,
        Err(CoreError::NotFound(NotFoundError::CodeMismatch))
    ));

    // Failure still armed the code-check gate
    let stored = f.accounts.find_by_id(account.id).await.unwrap().unwrap();
    assert!(stored.next_phone_code_request.is_some());

    // And the claim stays unverified
    let stored_claim = f.contacts.find_by_id(claim.id).await.unwrap().unwrap();
    assert!(!stored_claim.verified);
}

#[tokio::test]
async fn test_submit_provider_failure_passes_code_through() {
    let f = fixture_with(StubSmsProvider::approving().with_check(Ok(ProviderStatus::Failed {
        code: provider_codes::VERIFICATION_NOT_FOUND,
    })));
    let account = make_account(&f, "x").await;

    let claim = Contact::new(account.id, ContactChannel::Phone, NUMBER.to_string(), false);
    f.contacts.insert(claim).await;

    let result = f.service.submit(&account, NUMBER, "042137").await;

    match result {
        Err(CoreError::Upstream { code, .. }) => {
            assert_eq!(code, provider_codes::VERIFICATION_NOT_FOUND);
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_submit_number_not_on_account_not_found() {
    let f = fixture();
    let account = make_account(&f, "x").await;

    let result = f.service.submit(&account, NUMBER, "042137").await;

    assert!(matches!(
        result,
        Err(CoreError::NotFound(NotFoundError::ContactNotFound))
    ));
    // Nothing was checked against the provider
    assert!(f.provider.checks.lock().await.is_empty());
}

#[tokio::test]
async fn test_submit_code_check_gate_blocks_rapid_retries() {
    let f = fixture_with(StubSmsProvider::approving().with_check(Ok(ProviderStatus::Pending)));
    let account = make_account(&f, "x").await;

    let claim = Contact::new(account.id, ContactChannel::Phone, NUMBER.to_string(), false);
    f.contacts.insert(claim).await;

    let _ = f.service.submit(&account, NUMBER, "042137").await;

    let stored = f.accounts.find_by_id(account.id).await.unwrap().unwrap();
    let retry = f.service.submit(&stored, NUMBER, "042137").await;

    assert!(matches!(retry, Err(CoreError::Throttled { .. })));
    assert_eq!(f.provider.checks.lock().await.len(), 1);
}

#[tokio::test]
async fn test_submit_bad_code_format_rejected_before_provider() {
    let f = fixture();
    let account = make_account(&f, "x").await;

    let claim = Contact::new(account.id, ContactChannel::Phone, NUMBER.to_string(), false);
    f.contacts.insert(claim).await;

    let result = f.service.submit(&account, NUMBER, "42").await;

    assert!(matches!(
        result,
        Err(CoreError::Validation(ValidationError::InvalidCodeFormat))
    ));
    assert!(f.provider.checks.lock().await.is_empty());
}
