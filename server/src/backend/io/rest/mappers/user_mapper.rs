use shared::{User as UserDto, UserRole};

use crate::backend::domain::models::user::{Role, User};

pub struct UserMapper;

impl UserMapper {
    pub fn role_to_domain(role: UserRole) -> Role {
        match role {
            UserRole::Student => Role::Student,
            UserRole::Admin => Role::Admin,
        }
    }

    pub fn role_to_dto(role: Role) -> UserRole {
        match role {
            Role::Student => UserRole::Student,
            Role::Admin => UserRole::Admin,
        }
    }

    pub fn to_dto(domain: User) -> UserDto {
        UserDto {
            id: domain.id,
            email: domain.email,
            student_id: domain.student_id,
            role: Self::role_to_dto(domain.role),
            is_active: domain.is_active,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain: Vec<User>) -> Vec<UserDto> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
