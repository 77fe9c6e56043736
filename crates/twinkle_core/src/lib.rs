//! Twinkle Core Runtime
//!
//! Foundational primitives shared by the Twinkle document model and widgets:
//!
//! - **Event Dispatch**: pointer events routed to handlers registered per target
//! - **State Machines**: flat statecharts for widget interaction states
//!
//! # Example
//!
//! ```rust
//! use twinkle_core::events::event_types;
//! use twinkle_core::fsm::StateMachine;
//!
//! const IDLE: u32 = 0;
//! const HOVERED: u32 = 1;
//!
//! let mut hover = StateMachine::builder(IDLE)
//!     .on(IDLE, event_types::POINTER_ENTER, HOVERED)
//!     .on(HOVERED, event_types::POINTER_LEAVE, IDLE)
//!     .build();
//!
//! hover.send(event_types::POINTER_ENTER);
//! assert!(hover.is_in(HOVERED));
//! ```

pub mod events;
pub mod fsm;

pub use events::{deliver, Event, EventDispatcher, EventHandler, EventType};
pub use fsm::{StateId, StateMachine, Transition};
