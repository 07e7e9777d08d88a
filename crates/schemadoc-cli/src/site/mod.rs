mod atomic;
mod pages;

pub use pages::build_site;
