pub mod buffer;
pub mod carousel;
pub mod centering;
pub mod config;
pub mod driver;
pub mod error;
pub mod host;
pub mod reset;
pub mod scale;
pub mod timer;

pub use buffer::{Element, ElementBuffer};
pub use carousel::{
    CardReading, Carousel, CarouselEvent, CarouselStats, HostCommand, SurfaceId, SurfaceState,
};
pub use config::{AppConfig, CarouselConfig, EasingType, ScrollConfig};
pub use driver::CarouselDriver;
pub use error::{Error, Result};
pub use host::RenderSurface;
pub use reset::{ResetPhase, ResetState, SwapToken};
pub use scale::ProximityScaler;
pub use timer::SwapScheduler;
