pub mod deployment_dto;
pub mod system_dto;
