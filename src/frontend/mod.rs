pub mod debugger;
pub mod renderer;
