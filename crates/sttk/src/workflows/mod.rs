pub mod sttk;
