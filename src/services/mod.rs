pub mod festive;
