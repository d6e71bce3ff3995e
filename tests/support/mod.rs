pub mod socket_guard;
pub mod stalled_body;
