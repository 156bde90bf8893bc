mod common;

use std::time::Duration;

use multi_rpc::{Error, MultiRpcProviderBuilder};

use crate::common::spawn_anvil;

#[tokio::test]
async fn fails_over_past_a_dead_endpoint() -> anyhow::Result<()> {
    let anvil = spawn_anvil(None)?;

    // Nothing listens on the discard port; the pool must rotate past it.
    let provider = MultiRpcProviderBuilder::<alloy::network::Ethereum>::new()
        .endpoint("http://127.0.0.1:9".to_owned())
        .endpoint(anvil.endpoint_url().as_str().to_owned())
        .call_timeout(Duration::from_secs(2))
        .build()
        .await?;

    let _head = provider.get_block_number().await?;

    let status = provider.status();
    assert_eq!(status.current_index, 1);
    assert_eq!(status.request_count, 1);
    assert_eq!(status.total_providers, 2);
    Ok(())
}

#[tokio::test]
async fn exhausting_every_endpoint_surfaces_all_providers_failed() -> anyhow::Result<()> {
    let provider = MultiRpcProviderBuilder::<alloy::network::Ethereum>::new()
        .endpoint("http://127.0.0.1:9".to_owned())
        .endpoint("http://127.0.0.1:19".to_owned())
        .call_timeout(Duration::from_secs(2))
        .build()
        .await?;

    match provider.get_block_number().await {
        Err(Error::AllProvidersFailed { attempts: 2, .. }) => {}
        other => panic!("expected AllProvidersFailed over 2 endpoints, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn threshold_rotation_spreads_load_across_healthy_endpoints() -> anyhow::Result<()> {
    let anvil = spawn_anvil(None)?;

    let provider = MultiRpcProviderBuilder::<alloy::network::Ethereum>::new()
        .endpoint(anvil.endpoint_url().as_str().to_owned())
        .endpoint(anvil.ws_endpoint_url().as_str().to_owned())
        .rotation_threshold(2)
        .build()
        .await?;

    provider.get_block_number().await?;
    assert_eq!(provider.status().current_index, 0);

    provider.get_block_number().await?;
    let status = provider.status();
    assert_eq!(status.current_index, 1);
    assert_eq!(status.request_count, 0);

    // Calls keep working from the rotated endpoint.
    provider.get_block_number().await?;
    assert_eq!(provider.status().request_count, 1);
    Ok(())
}

#[tokio::test]
async fn manual_switch_validates_the_index() -> anyhow::Result<()> {
    let anvil = spawn_anvil(None)?;
    let provider = common::build_provider(&anvil).await?;

    match provider.pool().set_current(5) {
        Err(Error::OutOfRange { index: 5, len: 1 }) => {}
        other => panic!("expected OutOfRange, got {other:?}"),
    }

    provider.pool().set_current(0)?;
    provider.get_block_number().await?;
    Ok(())
}

#[tokio::test]
async fn status_reports_configured_urls_in_order() -> anyhow::Result<()> {
    let anvil = spawn_anvil(None)?;
    let http_url = anvil.endpoint_url().as_str().to_owned();
    let ws_url = anvil.ws_endpoint_url().as_str().to_owned();

    let provider = MultiRpcProviderBuilder::<alloy::network::Ethereum>::new()
        .endpoint(http_url.clone())
        .endpoint(ws_url.clone())
        .build()
        .await?;

    assert_eq!(provider.status().rpc_urls, vec![http_url, ws_url]);
    Ok(())
}
