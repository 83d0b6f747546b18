// Wire shapes for the resource endpoints and the checks applied to incoming bodies
pub mod dto;
pub mod validation;
