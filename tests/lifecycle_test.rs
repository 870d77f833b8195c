use boostgate::catalog::FixedPricingCatalog;
use boostgate::db::init_db;
use boostgate::domain::{
    BoostDuration, BoostId, BoostStatus, BoostType, Decimal, DurationUnit, NewBoost, ScopeId,
    ScopeType, TimeMs, VendorId,
};
use boostgate::engine::{AdmissionController, LifecycleEngine, SweepDriver};
use boostgate::{AppError, Boost, Repository};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct TestEnv {
    repo: Arc<Repository>,
    admission: AdmissionController,
    lifecycle: LifecycleEngine,
    driver: SweepDriver,
    _temp: TempDir,
}

async fn setup() -> TestEnv {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("test.db").to_string_lossy().to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let catalog = Arc::new(
        FixedPricingCatalog::new().with_price(BoostType::Featured, Decimal::zero()),
    );
    let admission = AdmissionController::new(repo.clone(), catalog);
    let lifecycle = LifecycleEngine::new(repo.clone());
    let driver = SweepDriver::new(repo.clone(), Duration::from_secs(60));

    TestEnv {
        repo,
        admission,
        lifecycle,
        driver,
        _temp: temp,
    }
}

fn vendor(id: &str) -> VendorId {
    VendorId::new(id.to_string())
}

/// Admit a zero-priced one-hour boost the sweep can drive through its window.
async fn admit(env: &TestEnv, v: &VendorId, scope: &str, start_date: &str) -> Boost {
    env.admission
        .create_boost(
            v,
            NewBoost {
                boost_type: BoostType::Featured,
                scope_type: ScopeType::Product,
                scope_ids: vec![ScopeId::new(scope.to_string())],
                duration: BoostDuration {
                    value: 1,
                    unit: DurationUnit::Hour,
                },
                price: None,
                start_date: start_date.to_string(),
            },
        )
        .await
        .expect("create failed")
}

async fn activate(env: &TestEnv, boost: &Boost) {
    env.driver
        .run_once(TimeMs::new(boost.start_ms.as_ms()))
        .await
        .expect("sweep failed");
}

#[tokio::test]
async fn test_stop_requires_active_status() {
    let env = setup().await;
    let v = vendor("v-1");
    let boost = admit(&env, &v, "p-1", "2030-01-01").await;

    // Scheduled boosts cannot be stopped.
    let err = env.lifecycle.stop_boost(&v, &boost.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let unchanged = env.repo.get_boost(&v, &boost.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, BoostStatus::Scheduled);

    activate(&env, &boost).await;
    let stopped = env.lifecycle.stop_boost(&v, &boost.id).await.unwrap();
    assert_eq!(stopped.status, BoostStatus::Stopped);
    // Stopping cuts the window short.
    assert!(stopped.end_ms < boost.end_ms);
    assert!(stopped.end_ms <= TimeMs::now());

    // A second stop finds nothing active.
    let err = env.lifecycle.stop_boost(&v, &boost.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_stop_is_scoped_to_the_owner() {
    let env = setup().await;
    let v = vendor("v-1");
    let boost = admit(&env, &v, "p-1", "2030-01-01").await;
    activate(&env, &boost).await;

    let err = env
        .lifecycle
        .stop_boost(&vendor("v-2"), &boost.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let unchanged = env.repo.get_boost(&v, &boost.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, BoostStatus::Active);
}

#[tokio::test]
async fn test_delete_only_from_draft_or_expired() {
    let env = setup().await;
    let v = vendor("v-1");
    let boost = admit(&env, &v, "p-1", "2030-01-01").await;

    // Scheduled: not deletable.
    let err = env.lifecycle.delete_boost(&v, &boost.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    activate(&env, &boost).await;
    // Active: not deletable, state unchanged.
    let err = env.lifecycle.delete_boost(&v, &boost.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let unchanged = env.repo.get_boost(&v, &boost.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, BoostStatus::Active);
    assert!(!unchanged.is_deleted);

    // Expire it, then deletion succeeds.
    env.driver
        .run_once(TimeMs::new(boost.end_ms.as_ms()))
        .await
        .unwrap();
    let deleted = env.lifecycle.delete_boost(&v, &boost.id).await.unwrap();
    assert!(deleted.is_deleted);

    // Soft-deleted: invisible to reads and to repeat deletes.
    assert!(env.repo.get_boost(&v, &boost.id).await.unwrap().is_none());
    assert!(env.admission.list_boosts(&v, None).await.unwrap().is_empty());
    let err = env.lifecycle.delete_boost(&v, &boost.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_deleted_scope_no_longer_conflicts() {
    let env = setup().await;
    let v = vendor("v-1");
    let boost = admit(&env, &v, "p-1", "2030-01-01").await;

    // Expire and delete, freeing the scope.
    env.driver
        .run_once(TimeMs::new(boost.end_ms.as_ms()))
        .await
        .unwrap();
    env.lifecycle.delete_boost(&v, &boost.id).await.unwrap();

    admit(&env, &v, "p-1", "2030-01-01").await;
}

#[tokio::test]
async fn test_admin_override_and_idempotent_reissue() {
    let env = setup().await;
    let v = vendor("v-1");
    let boost = admit(&env, &v, "p-1", "2030-01-01").await;

    let forced = env
        .lifecycle
        .admin_set_status("root", &boost.id, BoostStatus::Active)
        .await
        .unwrap();
    assert_eq!(forced.status, BoostStatus::Active);
    assert!(forced.admin_flagged);

    // Re-issuing the same override is a no-op success, not an error.
    let again = env
        .lifecycle
        .admin_set_status("root", &boost.id, BoostStatus::Active)
        .await
        .unwrap();
    assert_eq!(again.status, BoostStatus::Active);
    assert_eq!(again.updated_at_ms, forced.updated_at_ms);
}

#[tokio::test]
async fn test_admin_override_to_stopped_cuts_window() {
    let env = setup().await;
    let v = vendor("v-1");
    let boost = admit(&env, &v, "p-1", "2030-01-01").await;

    let forced = env
        .lifecycle
        .admin_set_status("root", &boost.id, BoostStatus::Stopped)
        .await
        .unwrap();
    assert_eq!(forced.status, BoostStatus::Stopped);
    assert!(forced.end_ms < boost.end_ms);
}

#[tokio::test]
async fn test_admin_override_rejects_bad_targets_and_unknown_ids() {
    let env = setup().await;
    let v = vendor("v-1");
    let boost = admit(&env, &v, "p-1", "2030-01-01").await;

    for target in [BoostStatus::Draft, BoostStatus::Scheduled] {
        let err = env
            .lifecycle
            .admin_set_status("root", &boost.id, target)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    let err = env
        .lifecycle
        .admin_set_status("root", &BoostId::new("missing".to_string()), BoostStatus::Active)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_sweep_does_not_resurrect_stopped_boosts() {
    let env = setup().await;
    let v = vendor("v-1");
    let boost = admit(&env, &v, "p-1", "2030-01-01").await;
    activate(&env, &boost).await;
    env.lifecycle.stop_boost(&v, &boost.id).await.unwrap();

    // Sweeping past the original end leaves the stopped record alone.
    let stats = env
        .driver
        .run_once(TimeMs::new(boost.end_ms.as_ms() + 1))
        .await
        .unwrap();
    assert_eq!(stats.activated, 0);
    assert_eq!(stats.expired, 0);

    let settled = env.repo.get_boost(&v, &boost.id).await.unwrap().unwrap();
    assert_eq!(settled.status, BoostStatus::Stopped);
}
