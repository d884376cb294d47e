// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// Ações sensíveis do sistema. Cada handler declara a sua via
// `RequirePermission<T>`; a tabela `role_allows` decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ManageCatalog,
    ManageUsers,
    AdjustStock,
    CreateTransaction,
    ConfirmTransaction,
    CompleteTransaction,
    CancelTransaction,
    DeleteDraft,
    ViewReports,
}

impl Action {
    pub fn slug(self) -> &'static str {
        match self {
            Action::ManageCatalog => "catalog:write",
            Action::ManageUsers => "users:write",
            Action::AdjustStock => "inventory:adjust",
            Action::CreateTransaction => "transactions:create",
            Action::ConfirmTransaction => "transactions:confirm",
            Action::CompleteTransaction => "transactions:complete",
            Action::CancelTransaction => "transactions:cancel",
            Action::DeleteDraft => "transactions:delete",
            Action::ViewReports => "reports:read",
        }
    }
}

/// Tabela de autorização: papel -> ações permitidas. Uma função explícita
/// em vez de metadados: fácil de ler, fácil de testar.
pub fn role_allows(role: Role, action: Action) -> bool {
    use Action::*;
    match role {
        // Donos e administradores fazem tudo (incluindo confirmar).
        Role::Owner | Role::Admin => true,
        // Balcão: vende, conclui e consulta relatórios.
        Role::Staff => matches!(action, CreateTransaction | CompleteTransaction | ViewReports),
        // Almoxarifado: ajusta estoque e recebe compras.
        Role::Warehouse => matches!(
            action,
            AdjustStock | CreateTransaction | CompleteTransaction
        ),
    }
}

// O Trait que define a ação exigida por um handler
pub trait ActionDef: Send + Sync + 'static {
    fn action() -> Action;
}

// O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: ActionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // O auth_guard já colocou o usuário nos extensions
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        let action = T::action();
        if !role_allows(user.role, action) {
            return Err(AppError::Forbidden(action.slug()));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS AÇÕES (TIPOS)
// ---

pub struct PermManageCatalog;
impl ActionDef for PermManageCatalog {
    fn action() -> Action {
        Action::ManageCatalog
    }
}

pub struct PermManageUsers;
impl ActionDef for PermManageUsers {
    fn action() -> Action {
        Action::ManageUsers
    }
}

pub struct PermAdjustStock;
impl ActionDef for PermAdjustStock {
    fn action() -> Action {
        Action::AdjustStock
    }
}

pub struct PermCreateTransaction;
impl ActionDef for PermCreateTransaction {
    fn action() -> Action {
        Action::CreateTransaction
    }
}

pub struct PermConfirmTransaction;
impl ActionDef for PermConfirmTransaction {
    fn action() -> Action {
        Action::ConfirmTransaction
    }
}

pub struct PermCompleteTransaction;
impl ActionDef for PermCompleteTransaction {
    fn action() -> Action {
        Action::CompleteTransaction
    }
}

pub struct PermCancelTransaction;
impl ActionDef for PermCancelTransaction {
    fn action() -> Action {
        Action::CancelTransaction
    }
}

pub struct PermDeleteDraft;
impl ActionDef for PermDeleteDraft {
    fn action() -> Action {
        Action::DeleteDraft
    }
}

pub struct PermViewReports;
impl ActionDef for PermViewReports {
    fn action() -> Action {
        Action::ViewReports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [Action; 9] = [
        Action::ManageCatalog,
        Action::ManageUsers,
        Action::AdjustStock,
        Action::CreateTransaction,
        Action::ConfirmTransaction,
        Action::CompleteTransaction,
        Action::CancelTransaction,
        Action::DeleteDraft,
        Action::ViewReports,
    ];

    #[test]
    fn owner_and_admin_can_do_everything() {
        for action in ALL_ACTIONS {
            assert!(role_allows(Role::Owner, action));
            assert!(role_allows(Role::Admin, action));
        }
    }

    #[test]
    fn confirmation_is_admin_only() {
        assert!(!role_allows(Role::Staff, Action::ConfirmTransaction));
        assert!(!role_allows(Role::Warehouse, Action::ConfirmTransaction));
    }

    #[test]
    fn staff_sells_but_does_not_touch_inventory() {
        assert!(role_allows(Role::Staff, Action::CreateTransaction));
        assert!(role_allows(Role::Staff, Action::CompleteTransaction));
        assert!(!role_allows(Role::Staff, Action::AdjustStock));
        assert!(!role_allows(Role::Staff, Action::ManageUsers));
        assert!(!role_allows(Role::Staff, Action::ManageCatalog));
    }

    #[test]
    fn warehouse_adjusts_stock_but_has_no_admin_powers() {
        assert!(role_allows(Role::Warehouse, Action::AdjustStock));
        assert!(role_allows(Role::Warehouse, Action::CompleteTransaction));
        assert!(!role_allows(Role::Warehouse, Action::ManageUsers));
        assert!(!role_allows(Role::Warehouse, Action::CancelTransaction));
        assert!(!role_allows(Role::Warehouse, Action::ViewReports));
    }
}
