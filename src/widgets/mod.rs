mod wheel;
pub use wheel::{OnSpinEnd, Wheel, WheelOptions, WheelResponse, WheelRotation, WheelState};

mod log_window;
pub use log_window::LogWindow;
