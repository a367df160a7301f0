mod manager;

pub use manager::ImageCollection;
