pub mod game;
pub mod io;
pub mod rendering;
pub mod settings;
