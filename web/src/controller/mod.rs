pub(crate) mod google_meet_controller;
pub(crate) mod health_check_controller;
pub(crate) mod teams_controller;
