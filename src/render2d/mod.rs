/// CPU frame type.
pub mod frame;
/// `vello_cpu` renderer for the inspect, frame and build views.
pub mod renderer;
