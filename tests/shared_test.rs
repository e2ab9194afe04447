use service_registry::{
    BindOptions, Registry, RegistryConfig, RegistryError, SharedRegistry,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_shared_bind_and_resolve() {
    let registry = SharedRegistry::with_config(RegistryConfig::new("shared"));
    registry.bind("greeting", || "hello".to_string()).await.unwrap();

    let value = registry.resolve::<String>("greeting").await.unwrap();
    assert_eq!(value.as_str(), "hello");
    assert!(registry.contains("greeting").await);
}

#[tokio::test]
async fn test_shared_singleton_across_tasks() {
    let registry = SharedRegistry::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    registry
        .bind("pool", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![0u8; 16]
        })
        .await
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.resolve::<Vec<u8>>("pool").await.unwrap() })
        })
        .collect();

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(values.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[tokio::test]
async fn test_shared_locking() {
    let registry = SharedRegistry::new(Registry::new());
    registry
        .bind_with("config", || 1u32, BindOptions::singleton().locked())
        .await
        .unwrap();

    assert!(registry.is_locked("config").await);
    assert!(matches!(
        registry.rebind("config", || 2u32).await,
        Err(RegistryError::Locked { .. })
    ));
    assert!(matches!(
        registry.unbind("config").await,
        Err(RegistryError::Locked { .. })
    ));
    assert_eq!(*registry.resolve::<u32>("config").await.unwrap(), 1);
}

#[tokio::test]
async fn test_shared_snapshot_restore() {
    let registry = SharedRegistry::default();
    registry.bind("a", || 1i64).await.unwrap();
    registry.snapshot().await.unwrap();
    registry
        .try_bind_with(
            "b",
            || Ok::<_, std::io::Error>(2i64),
            BindOptions::transient(),
        )
        .await
        .unwrap();
    assert_eq!(registry.snapshot_depth().await, 1);
    assert_eq!(*registry.resolve::<i64>("b").await.unwrap(), 2);

    registry.restore().await.unwrap();

    assert!(matches!(
        registry.resolve::<i64>("b").await,
        Err(RegistryError::Unbound { .. })
    ));
    assert_eq!(*registry.resolve::<i64>("a").await.unwrap(), 1);
    assert!(matches!(
        registry.restore().await,
        Err(RegistryError::EmptySnapshotStack)
    ));
}
