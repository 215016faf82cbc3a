pub mod preprocessing;
