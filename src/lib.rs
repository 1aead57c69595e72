pub mod core {
    pub mod config;
    pub mod error;
    pub mod state;
    pub mod tracing_init;
}

pub mod api {
    pub mod client;

    #[cfg(test)]
    pub(crate) mod test_server;
}

pub mod session {
    pub mod bootstrap;
    pub mod context;
    pub mod login;
    pub mod logout;
    pub mod storage;
}

pub mod format {
    pub mod age;
    pub mod datetime;
    pub mod labels;
    pub mod number;
}

pub mod ui {
    pub mod alert;
    pub mod page;
}

pub mod forms {
    pub mod serialize;
    pub mod submit;
}
