pub mod shared {
    pub mod constants;
    pub mod face_location;
}

pub mod detection {
    pub mod domain {
        pub mod detection_model;
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod benchmark {
    pub mod benchmark_reporter;
    pub mod run_benchmark_use_case;
}
