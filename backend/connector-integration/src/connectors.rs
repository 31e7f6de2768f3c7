pub mod e24pipe;

pub use self::e24pipe::E24Pipe;
