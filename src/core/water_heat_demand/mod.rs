pub mod hot_water;
