// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SessionRepository, UserRepository},
    models::{
        auth::{
            Claims, CreateUserPayload, LoginResponse, Role, TokenPair, UpdateUserPayload, User,
        },
        event::ResourceKind,
    },
    services::notifier::Notifier,
};

// Access token curto; o refresh token (opaco, rotacionado) é quem dura.
const ACCESS_TOKEN_MINUTES: i64 = 15;
const REFRESH_TOKEN_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    session_repo: SessionRepository,
    jwt_secret: String,
    pool: PgPool,
    notifier: Notifier,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        session_repo: SessionRepository,
        jwt_secret: String,
        pool: PgPool,
        notifier: Notifier,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            jwt_secret,
            pool,
            notifier,
        }
    }

    // O bcrypt é caro de propósito; roda fora do executor async.
    async fn hash_password(password: String) -> Result<String, AppError> {
        let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        if !user.is_active {
            return Err(AppError::UserDisabled);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em uma thread separada
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.user_repo.touch_last_login(&self.pool, user.id).await?;

        // Limpeza oportunista; sessão vencida que sobrar só ocupa espaço.
        let _ = self.session_repo.delete_expired().await;

        let tokens = self.issue_tokens(user.id).await?;
        Ok(LoginResponse { user, tokens })
    }

    /// Rotação de refresh token: a sessão antiga é consumida de forma
    /// atômica e uma nova é criada. Reusar o token antigo depois disso
    /// falha com AUTH.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let mut tx = self.pool.begin().await?;

        let session = self
            .session_repo
            .take_by_token(&mut *tx, refresh_token)
            .await?
            .ok_or(AppError::RefreshTokenInvalid)?;

        if session.expires_at < Utc::now() {
            // Mantém a remoção da sessão vencida
            tx.commit().await?;
            return Err(AppError::RefreshTokenInvalid);
        }

        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await?
            .ok_or(AppError::RefreshTokenInvalid)?;
        if !user.is_active {
            tx.commit().await?;
            return Err(AppError::UserDisabled);
        }

        let access_token = self.create_access_token(user.id)?;
        let new_refresh_token = generate_refresh_token();
        let expires_at = Utc::now() + chrono::Duration::days(REFRESH_TOKEN_DAYS);
        self.session_repo
            .create(&mut *tx, user.id, &new_refresh_token, expires_at)
            .await?;

        tx.commit().await?;

        Ok(TokenPair {
            access_token,
            refresh_token: new_refresh_token,
        })
    }

    /// Logout idempotente: token já ausente não é erro.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        let removed = self.session_repo.delete_by_token(refresh_token).await?;
        if removed == 0 {
            tracing::debug!("Logout com refresh token já removido");
        }
        Ok(())
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;
        if !user.is_active {
            return Err(AppError::InvalidToken);
        }
        Ok(user)
    }

    async fn issue_tokens(&self, user_id: Uuid) -> Result<TokenPair, AppError> {
        let access_token = self.create_access_token(user_id)?;
        let refresh_token = generate_refresh_token();
        let expires_at = Utc::now() + chrono::Duration::days(REFRESH_TOKEN_DAYS);
        self.session_repo
            .create(&self.pool, user_id, &refresh_token, expires_at)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    fn create_access_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(ACCESS_TOKEN_MINUTES);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // ---
    // Gestão de usuários
    // ---

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list().await
    }

    pub async fn create_user(&self, payload: &CreateUserPayload) -> Result<User, AppError> {
        let hashed = Self::hash_password(payload.password.clone()).await?;
        let user = self
            .user_repo
            .create(
                &self.pool,
                &payload.email,
                &hashed,
                &payload.full_name,
                payload.role,
            )
            .await?;

        self.notifier.publish(ResourceKind::User, "created", Some(user.id));
        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        payload: &UpdateUserPayload,
    ) -> Result<User, AppError> {
        let password_hash = match &payload.password {
            Some(password) => Some(Self::hash_password(password.clone()).await?),
            None => None,
        };

        let user = self
            .user_repo
            .update(
                &self.pool,
                id,
                payload.full_name.as_deref(),
                payload.role,
                payload.is_active,
                password_hash.as_deref(),
            )
            .await?;

        self.notifier.publish(ResourceKind::User, "updated", Some(id));
        Ok(user)
    }

    pub async fn deactivate_user(&self, id: Uuid, acting: &User) -> Result<User, AppError> {
        if id == acting.id {
            return Err(AppError::CannotDeactivateSelf);
        }
        let user = self.user_repo.deactivate(&self.pool, id).await?;

        self.notifier.publish(ResourceKind::User, "deactivated", Some(id));
        Ok(user)
    }

    /// Primeiro start com a tabela vazia: cria o OWNER inicial a partir de
    /// ADMIN_EMAIL/ADMIN_PASSWORD, se definidos.
    pub async fn bootstrap_admin(&self) -> Result<(), AppError> {
        let count = self.user_repo.count(&self.pool).await?;
        if count > 0 {
            return Ok(());
        }

        let (Ok(email), Ok(password)) = (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD"))
        else {
            tracing::warn!(
                "Nenhum usuário cadastrado e ADMIN_EMAIL/ADMIN_PASSWORD não definidos; \
                 defina-os para criar o OWNER inicial."
            );
            return Ok(());
        };

        let hashed = Self::hash_password(password).await?;
        let user = self
            .user_repo
            .create(&self.pool, &email, &hashed, "Administrador", Role::Owner)
            .await?;
        tracing::info!("👤 Usuário OWNER inicial criado: {}", user.email);
        Ok(())
    }
}

// Token opaco: dois UUIDv4 concatenados (256 bits de aleatoriedade).
fn generate_refresh_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::generate_refresh_token;

    #[test]
    fn refresh_tokens_are_long_and_unique() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
