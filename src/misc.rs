pub mod batch_states;
pub mod cumsum;
pub mod stopwatch;
pub mod weight_initializer;
