pub mod analysis;
pub mod capture;
pub mod rendering;
pub mod session;
pub mod shared;

#[cfg(test)]
mod testing;
