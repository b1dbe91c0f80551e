pub mod meeting_form;
pub mod registrant;
pub mod user;
