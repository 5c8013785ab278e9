//! Mock repositories for testing

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use fanhall_db::{
    AccessCheckRepository, BlogBan, BlogBanRow, BlogGrant, BlogModerRow, CreateAccount,
    CredentialRepository, CredentialRow, DbError, DbResult, FandomBan, FandomBanRow, FandomGrant,
    FandomModerRow, ModerationRepository,
};
use fanhall_types::{BlogFlag, BlogId, FandomFlag, FandomId, UserId};

/// In-memory credential repository for testing
#[derive(Default)]
pub struct MockCredentialRepository {
    rows: DashMap<i64, CredentialRow>,
    by_username: DashMap<String, i64>,
    next_id: AtomicI64,
}

impl MockCredentialRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Self::default()
        }
    }
}

#[async_trait]
impl CredentialRepository for MockCredentialRepository {
    async fn create_account(&self, account: CreateAccount) -> DbResult<UserId> {
        // CITEXT semantics: usernames are case-insensitively unique
        let key = account.username.to_lowercase();
        if self.by_username.contains_key(&key) {
            return Err(DbError::UniqueViolation {
                constraint: Some("users_username_key".to_string()),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.by_username.insert(key, id);
        self.rows.insert(
            id,
            CredentialRow {
                id,
                password_hash: account.password_hash,
                nonce: Uuid::new_v4(),
            },
        );
        Ok(UserId(id))
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<CredentialRow>> {
        Ok(self
            .by_username
            .get(&username.to_lowercase())
            .and_then(|id| self.rows.get(id.value()).map(|r| r.value().clone())))
    }

    async fn nonce(&self, id: UserId) -> DbResult<Option<Uuid>> {
        Ok(self.rows.get(&id.0).map(|r| r.nonce))
    }

    async fn rotate_nonce(&self, id: UserId) -> DbResult<()> {
        if let Some(mut row) = self.rows.get_mut(&id.0) {
            row.nonce = Uuid::new_v4();
        }
        Ok(())
    }

    async fn set_password(&self, id: UserId, password_hash: &str) -> DbResult<()> {
        if let Some(mut row) = self.rows.get_mut(&id.0) {
            row.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn rotate_nonce_and_set_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> DbResult<()> {
        if let Some(mut row) = self.rows.get_mut(&id.0) {
            row.nonce = Uuid::new_v4();
            row.password_hash = password_hash.to_string();
        }
        Ok(())
    }
}

/// In-memory grant/ban/ownership store implementing both the check and
/// moderation repository traits over the same state, so guard inserts
/// are immediately visible to resolver probes.
#[derive(Default)]
pub struct MockModerationStore {
    users: DashMap<i64, ()>,
    admins: DashMap<i64, ()>,
    blog_owners: DashMap<i64, i64>,
    fandom_moders: DashMap<(i64, i64), FandomModerRow>,
    fandom_bans: DashMap<(i64, i64), FandomBanRow>,
    blog_moders: DashMap<(i64, i64), BlogModerRow>,
    blog_bans: DashMap<(i64, i64), BlogBanRow>,
}

impl MockModerationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: UserId) {
        self.users.insert(user.0, ());
    }

    pub fn add_admin(&self, user: UserId) {
        self.users.insert(user.0, ());
        self.admins.insert(user.0, ());
    }

    pub fn add_blog(&self, blog: BlogId, owner: UserId) {
        self.users.insert(owner.0, ());
        self.blog_owners.insert(blog.0, owner.0);
    }

    /// Shorthand for an all-flags fandom grant
    pub fn full_fandom_grant(user: UserId, fandom: FandomId, set_by: UserId) -> FandomGrant {
        FandomGrant {
            user_id: user,
            fandom_id: fandom,
            set_by,
            edit_f: true,
            manage_f: true,
            ban_f: true,
            create_b: true,
            edit_b: true,
            edit_p: true,
            edit_c: true,
        }
    }

    /// Shorthand for an all-flags blog grant
    pub fn full_blog_grant(user: UserId, blog: BlogId, set_by: UserId) -> BlogGrant {
        BlogGrant {
            user_id: user,
            blog_id: blog,
            set_by,
            edit_b: true,
            manage_b: true,
            ban_b: true,
            create_p: true,
            edit_p: true,
            edit_c: true,
        }
    }
}

fn fandom_grant_row(grant: &FandomGrant) -> FandomModerRow {
    FandomModerRow {
        user_id: grant.user_id.0,
        fandom_id: grant.fandom_id.0,
        set_by: grant.set_by.0,
        edit_f: grant.edit_f,
        manage_f: grant.manage_f,
        ban_f: grant.ban_f,
        create_b: grant.create_b,
        edit_b: grant.edit_b,
        edit_p: grant.edit_p,
        edit_c: grant.edit_c,
    }
}

fn blog_grant_row(grant: &BlogGrant) -> BlogModerRow {
    BlogModerRow {
        user_id: grant.user_id.0,
        blog_id: grant.blog_id.0,
        set_by: grant.set_by.0,
        edit_b: grant.edit_b,
        manage_b: grant.manage_b,
        ban_b: grant.ban_b,
        create_p: grant.create_p,
        edit_p: grant.edit_p,
        edit_c: grant.edit_c,
    }
}

fn unique_violation(constraint: &str) -> DbError {
    DbError::UniqueViolation {
        constraint: Some(constraint.to_string()),
    }
}

#[async_trait]
impl AccessCheckRepository for MockModerationStore {
    async fn user_exists(&self, user: UserId) -> DbResult<bool> {
        Ok(self.users.contains_key(&user.0))
    }

    async fn is_admin(&self, user: UserId) -> DbResult<bool> {
        Ok(self.admins.contains_key(&user.0))
    }

    async fn fandom_moder(
        &self,
        user: UserId,
        fandom: FandomId,
        flag: Option<FandomFlag>,
    ) -> DbResult<bool> {
        Ok(self
            .fandom_moders
            .get(&(user.0, fandom.0))
            .is_some_and(|row| match flag {
                None => true,
                Some(FandomFlag::EditF) => row.edit_f,
                Some(FandomFlag::ManageF) => row.manage_f,
                Some(FandomFlag::BanF) => row.ban_f,
                Some(FandomFlag::CreateB) => row.create_b,
                Some(FandomFlag::EditB) => row.edit_b,
                Some(FandomFlag::EditP) => row.edit_p,
                Some(FandomFlag::EditC) => row.edit_c,
            }))
    }

    async fn fandom_banned(&self, user: UserId, fandom: FandomId) -> DbResult<bool> {
        Ok(self.fandom_bans.contains_key(&(user.0, fandom.0)))
    }

    async fn blog_moder(
        &self,
        user: UserId,
        blog: BlogId,
        flag: Option<BlogFlag>,
    ) -> DbResult<bool> {
        Ok(self
            .blog_moders
            .get(&(user.0, blog.0))
            .is_some_and(|row| match flag {
                None => true,
                Some(BlogFlag::EditB) => row.edit_b,
                Some(BlogFlag::ManageB) => row.manage_b,
                Some(BlogFlag::BanB) => row.ban_b,
                Some(BlogFlag::CreateP) => row.create_p,
                Some(BlogFlag::EditP) => row.edit_p,
                Some(BlogFlag::EditC) => row.edit_c,
            }))
    }

    async fn blog_banned(&self, user: UserId, blog: BlogId) -> DbResult<bool> {
        Ok(self.blog_bans.contains_key(&(user.0, blog.0)))
    }

    async fn blog_owner(&self, user: UserId, blog: BlogId) -> DbResult<bool> {
        Ok(self
            .blog_owners
            .get(&blog.0)
            .is_some_and(|owner| *owner.value() == user.0))
    }
}

#[async_trait]
impl ModerationRepository for MockModerationStore {
    async fn list_fandom_moders(&self, fandom: FandomId) -> DbResult<Vec<FandomModerRow>> {
        let mut rows: Vec<_> = self
            .fandom_moders
            .iter()
            .filter(|e| e.key().1 == fandom.0)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by_key(|r| r.user_id);
        Ok(rows)
    }

    async fn find_fandom_moder(
        &self,
        fandom: FandomId,
        user: UserId,
    ) -> DbResult<Option<FandomModerRow>> {
        Ok(self
            .fandom_moders
            .get(&(user.0, fandom.0))
            .map(|r| r.value().clone()))
    }

    async fn insert_fandom_moder(&self, grant: FandomGrant) -> DbResult<()> {
        let key = (grant.user_id.0, grant.fandom_id.0);
        if self.fandom_moders.contains_key(&key) {
            return Err(unique_violation("fandom_moders_pkey"));
        }
        self.fandom_moders.insert(key, fandom_grant_row(&grant));
        Ok(())
    }

    async fn update_fandom_moder(&self, grant: FandomGrant) -> DbResult<()> {
        let key = (grant.user_id.0, grant.fandom_id.0);
        if self.fandom_moders.contains_key(&key) {
            self.fandom_moders.insert(key, fandom_grant_row(&grant));
        }
        Ok(())
    }

    async fn delete_fandom_moder(&self, fandom: FandomId, user: UserId) -> DbResult<()> {
        self.fandom_moders.remove(&(user.0, fandom.0));
        Ok(())
    }

    async fn list_fandom_bans(&self, fandom: FandomId) -> DbResult<Vec<FandomBanRow>> {
        let mut rows: Vec<_> = self
            .fandom_bans
            .iter()
            .filter(|e| e.key().1 == fandom.0)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by_key(|r| r.user_id);
        Ok(rows)
    }

    async fn find_fandom_ban(
        &self,
        fandom: FandomId,
        user: UserId,
    ) -> DbResult<Option<FandomBanRow>> {
        Ok(self
            .fandom_bans
            .get(&(user.0, fandom.0))
            .map(|r| r.value().clone()))
    }

    async fn insert_fandom_ban(&self, ban: FandomBan) -> DbResult<()> {
        let key = (ban.user_id.0, ban.fandom_id.0);
        if self.fandom_bans.contains_key(&key) {
            return Err(unique_violation("fandom_bans_pkey"));
        }
        self.fandom_bans.insert(
            key,
            FandomBanRow {
                user_id: ban.user_id.0,
                fandom_id: ban.fandom_id.0,
                set_by: ban.set_by.0,
                reason: ban.reason,
            },
        );
        Ok(())
    }

    async fn delete_fandom_ban(&self, fandom: FandomId, user: UserId) -> DbResult<()> {
        self.fandom_bans.remove(&(user.0, fandom.0));
        Ok(())
    }

    async fn list_blog_moders(&self, blog: BlogId) -> DbResult<Vec<BlogModerRow>> {
        let mut rows: Vec<_> = self
            .blog_moders
            .iter()
            .filter(|e| e.key().1 == blog.0)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by_key(|r| r.user_id);
        Ok(rows)
    }

    async fn find_blog_moder(
        &self,
        blog: BlogId,
        user: UserId,
    ) -> DbResult<Option<BlogModerRow>> {
        Ok(self
            .blog_moders
            .get(&(user.0, blog.0))
            .map(|r| r.value().clone()))
    }

    async fn insert_blog_moder(&self, grant: BlogGrant) -> DbResult<()> {
        let key = (grant.user_id.0, grant.blog_id.0);
        if self.blog_moders.contains_key(&key) {
            return Err(unique_violation("blog_moders_pkey"));
        }
        self.blog_moders.insert(key, blog_grant_row(&grant));
        Ok(())
    }

    async fn update_blog_moder(&self, grant: BlogGrant) -> DbResult<()> {
        let key = (grant.user_id.0, grant.blog_id.0);
        if self.blog_moders.contains_key(&key) {
            self.blog_moders.insert(key, blog_grant_row(&grant));
        }
        Ok(())
    }

    async fn delete_blog_moder(&self, blog: BlogId, user: UserId) -> DbResult<()> {
        self.blog_moders.remove(&(user.0, blog.0));
        Ok(())
    }

    async fn list_blog_bans(&self, blog: BlogId) -> DbResult<Vec<BlogBanRow>> {
        let mut rows: Vec<_> = self
            .blog_bans
            .iter()
            .filter(|e| e.key().1 == blog.0)
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by_key(|r| r.user_id);
        Ok(rows)
    }

    async fn find_blog_ban(&self, blog: BlogId, user: UserId) -> DbResult<Option<BlogBanRow>> {
        Ok(self
            .blog_bans
            .get(&(user.0, blog.0))
            .map(|r| r.value().clone()))
    }

    async fn insert_blog_ban(&self, ban: BlogBan) -> DbResult<()> {
        let key = (ban.user_id.0, ban.blog_id.0);
        if self.blog_bans.contains_key(&key) {
            return Err(unique_violation("blog_bans_pkey"));
        }
        self.blog_bans.insert(
            key,
            BlogBanRow {
                user_id: ban.user_id.0,
                blog_id: ban.blog_id.0,
                set_by: ban.set_by.0,
                reason: ban.reason,
            },
        );
        Ok(())
    }

    async fn delete_blog_ban(&self, blog: BlogId, user: UserId) -> DbResult<()> {
        self.blog_bans.remove(&(user.0, blog.0));
        Ok(())
    }
}

/// A store shared between a guard and a resolver in tests
pub fn shared_store() -> Arc<MockModerationStore> {
    Arc::new(MockModerationStore::new())
}
