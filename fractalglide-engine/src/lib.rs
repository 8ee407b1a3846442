pub mod assembler;
pub mod debounce;
pub mod error;
pub mod export;
pub mod input;
pub mod pool;
pub mod renderer;
pub mod scheduler;
pub mod state;
pub mod subscribe;
pub mod surface;

pub use assembler::FrameAssembler;
pub use debounce::DebounceTimer;
pub use error::EngineError;
pub use export::export_png;
pub use input::{GamepadSource, InteractionController, PadSettings, PointerEvent};
pub use pool::{TileResult, WorkerPool};
pub use renderer::{
    FractalRenderer, RendererConfig, DEFAULT_FULL_RES_DELAY, DEFAULT_PREVIEW_SCALING,
    PROGRESS_CLEAR_DELAY,
};
pub use scheduler::{PassKind, ProgressiveScheduler};
pub use state::RendererState;
pub use subscribe::{Subscribers, SubscriptionId};
pub use surface::FrameSurface;

/// Convenience result type for the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;
