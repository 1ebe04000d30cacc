pub mod office_bearers;
