// Gallery event handling - link dispatch and embed rendering.

pub mod dispatcher;

pub mod renderer;
