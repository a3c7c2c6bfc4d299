//! Card rendering: a pure compile step producing a [`plan::CardPlan`], executed on the CPU.

pub mod cpu;
pub mod frame;
pub mod plan;
pub mod text;
