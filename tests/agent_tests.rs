//! GiftHuntAgent and host protocol tests

#![cfg(feature = "host")]

mod support;

#[cfg(test)]
mod tests {
    use super::support::{MockHost, MockNotifier};
    use gift_hunt::protocol::HostEvent;
    use gift_hunt::{
        AgentConfig, EventReply, GiftConfig, GiftHuntAgent, GiftHuntService, GiftHuntSettings,
        LifecycleState, MarkerHandle, Position, StaticLevelTable,
    };
    use parking_lot::Mutex;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::sync::mpsc;

    const SEED: &str = "Movement:qWAH2AB5/m4:MEk";

    type Shared = Arc<Mutex<GiftHuntService<MockHost, MockNotifier>>>;

    fn shared_service() -> Shared {
        let host = MockHost::in_level("TUT_MOVEMENT")
            .with_player(Position::new(30.0, 0.0, 0.0), Some(Position::zero()));
        Arc::new(Mutex::new(GiftHuntService::with_rng(
            GiftConfig::default(),
            Arc::new(StaticLevelTable::builtin()),
            host,
            MockNotifier::default(),
            SmallRng::seed_from_u64(5),
        )))
    }

    // -----------------------------------------------------------------------
    // Direct dispatch
    // -----------------------------------------------------------------------

    #[test]
    fn initialized_applies_config() {
        let service = shared_service();
        let config = AgentConfig {
            stored_seed: SEED.into(),
            ..Default::default()
        };
        let (agent, _handle) = GiftHuntAgent::new(config, service.clone());

        assert_eq!(agent.handle(HostEvent::Initialized, Instant::now()), EventReply::Ack);
        assert!(service.lock().is_enabled());
        assert_eq!(agent.stats().state, LifecycleState::Armed);
    }

    #[test]
    fn failures_carry_the_player_message() {
        let service = shared_service();
        let (agent, _handle) = GiftHuntAgent::new(AgentConfig::default(), service);
        let now = Instant::now();
        agent.handle(HostEvent::Initialized, now);

        let reply = agent.handle(HostEvent::LoadFromClipboard { seed: "junk".into() }, now);
        assert_eq!(reply, EventReply::Failed("Invalid gift seed.".into()));
    }

    #[test]
    fn captured_seed_goes_to_the_clipboard() {
        let service = shared_service();
        let (clip_tx, mut clip_rx) = mpsc::unbounded_channel();
        let (agent, _handle) = GiftHuntAgent::new(AgentConfig::default(), service);
        let agent = agent.with_clipboard(clip_tx);
        agent.handle(HostEvent::Initialized, Instant::now());

        let seed = match agent.handle(HostEvent::CaptureSeed, Instant::now()) {
            EventReply::SeedCaptured(seed) => seed,
            other => panic!("expected a captured seed, got {:?}", other),
        };
        assert_eq!(clip_rx.try_recv().unwrap(), seed);

        let updated = match agent.handle(HostEvent::UpdateLastSeedAux { aux_ms: 4_000 }, Instant::now()) {
            EventReply::SeedCaptured(seed) => seed,
            other => panic!("expected an updated seed, got {:?}", other),
        };
        assert_eq!(clip_rx.try_recv().unwrap(), updated);
    }

    #[test]
    fn failed_capture_is_not_forwarded() {
        let service = shared_service();
        let (clip_tx, mut clip_rx) = mpsc::unbounded_channel();
        let (agent, _handle) = GiftHuntAgent::new(AgentConfig::default(), service.clone());
        let agent = agent.with_clipboard(clip_tx);
        agent.handle(HostEvent::Initialized, Instant::now());

        service.lock().host_mut().restricted = true;
        assert!(matches!(
            agent.handle(HostEvent::CaptureSeed, Instant::now()),
            EventReply::Failed(_)
        ));
        assert!(clip_rx.try_recv().is_err());
    }

    #[test]
    fn agent_config_follows_settings() {
        let settings = GiftHuntSettings {
            enabled: false,
            gift_seed: SEED.into(),
            ..Default::default()
        };
        let config = AgentConfig::from(&settings);
        assert!(!config.enabled);
        assert_eq!(config.stored_seed, SEED);
        assert_eq!(config.queue_depth, 64);
    }

    // -----------------------------------------------------------------------
    // Through the inbox
    // -----------------------------------------------------------------------

    #[test]
    fn full_round_through_the_inbox() {
        let service = shared_service();
        let (agent, handle) = GiftHuntAgent::new(AgentConfig::default(), service.clone());

        let client = async move {
            handle.send(HostEvent::Initialized).await.unwrap();
            let reply = handle
                .request(HostEvent::LoadFromClipboard { seed: SEED.into() })
                .await
                .unwrap();
            assert_eq!(reply, EventReply::Ack);

            let EventReply::Spawned(Some(marker)) =
                handle.request(HostEvent::LevelLoadComplete).await.unwrap()
            else {
                panic!("marker should spawn");
            };

            let foreign = handle
                .request(HostEvent::PickupAttempt {
                    marker: MarkerHandle(marker.0 + 1),
                })
                .await
                .unwrap();
            assert_eq!(foreign, EventReply::Pickup { ours: false });

            let ours = handle
                .request(HostEvent::PickupAttempt { marker })
                .await
                .unwrap();
            assert_eq!(ours, EventReply::Pickup { ours: true });

            let cleared = handle.request(HostEvent::ClearGift).await.unwrap();
            assert_eq!(cleared, EventReply::Ack);
            // Dropping the last handle stops the agent.
        };

        tokio_test::block_on(async {
            tokio::join!(agent.serve(), client);
        });

        let svc = service.lock();
        assert!(svc.active_gift().is_none());
        assert_eq!(svc.stats().collections, 1);
    }

    #[test]
    fn requests_fail_once_the_agent_is_gone() {
        let service = shared_service();
        let (agent, handle) = GiftHuntAgent::new(AgentConfig::default(), service);
        drop(agent);

        tokio_test::block_on(async {
            assert!(handle.send(HostEvent::ClearGift).await.is_err());
            assert!(handle.request(HostEvent::ClearGift).await.is_err());
        });
    }

    // -----------------------------------------------------------------------
    // Wire format
    // -----------------------------------------------------------------------

    #[test]
    fn events_use_snake_case_tags() {
        let event: HostEvent =
            serde_json::from_str(r#"{ "type": "pickup_attempt", "marker": 7 }"#).unwrap();
        assert_eq!(
            event,
            HostEvent::PickupAttempt {
                marker: MarkerHandle(7)
            }
        );

        for event in [
            HostEvent::Initialized,
            HostEvent::SeedEntryChanged { seed: SEED.into() },
            HostEvent::SetEnabled { enabled: true },
            HostEvent::UpdateLastSeedAux { aux_ms: 1 },
            HostEvent::LevelLoadComplete,
        ] {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.kind());
        }
    }
}
