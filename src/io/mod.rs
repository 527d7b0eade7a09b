//! Audio file collaborators. The engine consumes and produces planar buffers only.

pub mod wav;
