//! Gift Hunt
//!
//! Capture a position inside a level as a short, shareable text seed, and
//! later respawn a collectible marker there from that seed.
//!
//! ## Architecture
//!
//! ```text
//! GiftHuntAgent  (agent.rs)      ← serializes host callbacks (host feature)
//!   └── GiftHuntService  (service.rs)
//!         ├── ApplyGate      (gate.rs)      ← cooldown, level-load rules
//!         ├── GiftLifecycle  (lifecycle.rs) ← active gift, marker, pickup
//!         │     └── ActorPool  (pool.rs)
//!         ├── capture        (capture.rs)   ← seed from player position
//!         └── SeedCodec      (seed.rs)      ← `<token>:<pos>[:<aux>]`
//!               ├── codec    (codec.rs)     ← bit packing, base64 framing
//!               └── LevelTokenMap (level.rs)
//! ```
//!
//! The host game plugs in through the traits in [`host`].

// Core modules are always available.
pub mod capture;
pub mod codec;
pub mod error;
pub mod gate;
pub mod host;
pub mod level;
pub mod lifecycle;
pub mod pool;
pub mod protocol;
pub mod seed;
pub mod service;
pub mod settings;
pub mod types;

// The event agent requires the `host` feature.
#[cfg(feature = "host")]
pub mod agent;

// Convenience re-exports
#[cfg(feature = "host")]
pub use agent::{AgentConfig, AgentHandle, EventReply, GiftHuntAgent};
pub use error::{GiftError, Result};
pub use gate::ApplyGate;
pub use host::{FeedbackSlot, LevelLoader, Notifier, WorldActuator};
pub use level::{LevelTokenMap, StaticLevelTable};
pub use lifecycle::{ActiveGift, GiftLifecycle, PickupOutcome};
pub use seed::{DecodedSeed, SeedCodec};
pub use service::GiftHuntService;
pub use settings::{GiftHuntSettings, SettingChange};
pub use types::{
    GiftConfig, GiftStats, LevelId, LifecycleState, LoadMode, MarkerHandle, MenuState, Position,
};
