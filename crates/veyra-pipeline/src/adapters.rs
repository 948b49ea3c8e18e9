//! Port implementations for the HTTP clients.

use async_trait::async_trait;
use veyra_llm::{GenerationParams, LlmClient, LlmError};
use veyra_x::{FollowersPage, RecentPostsQuery, XApiError, XClient, XPost, XUser};

use crate::ports::{ReadApi, TextGenerator, WriteApi};

#[async_trait]
impl ReadApi for XClient {
    async fn get_user(&self, username: &str) -> Result<XUser, XApiError> {
        XClient::get_user(self, username).await
    }

    async fn get_followers(
        &self,
        user_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<FollowersPage, XApiError> {
        XClient::get_followers(self, user_id, page_size, page_token).await
    }

    async fn get_recent_posts(
        &self,
        user_id: &str,
        query: &RecentPostsQuery,
    ) -> Result<Vec<XPost>, XApiError> {
        self.get_user_tweets(user_id, query).await
    }
}

#[async_trait]
impl WriteApi for XClient {
    async fn create_post(&self, text: &str, reply_to: Option<&str>) -> Result<String, XApiError> {
        let created = XClient::create_post(self, text, reply_to).await?;
        Ok(created.id)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: GenerationParams,
    ) -> Result<String, LlmError> {
        LlmClient::generate(self, system_prompt, user_prompt, params).await
    }
}
