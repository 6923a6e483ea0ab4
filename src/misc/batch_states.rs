use tch::{Device, Tensor};

/// Stacks a list of per-step tensors along a new leading batch dimension and
/// moves the result onto `device`.
pub(crate) fn batch_states(states: &[Tensor], device: Device) -> Tensor {
    Tensor::stack(states, 0).to_device(device)
}
