use crate::server::store::{parse_object_id, BlogDocument};
use core::pin::Pin;
use futures::{Stream, StreamExt};
use mongodb::bson::doc;
use mongodb::Collection;
use tonic::{Request, Response, Status};
use workshop_core::blog::blog_service_server::BlogService;
use workshop_core::blog::{
    CreateBlogRequest, CreateBlogResponse, DeleteBlogRequest, DeleteBlogResponse, ListBlogRequest,
    ListBlogResponse, ReadBlogRequest, ReadBlogResponse, UpdateBlogRequest, UpdateBlogResponse,
};
use workshop_core::Error;

/// gRPC entry point for the blog service.
///
/// The collection handle is injected at construction time so the handler
/// carries no process-global storage state.
#[derive(Clone)]
pub struct BlogHandler {
    collection: Collection<BlogDocument>,
}

impl BlogHandler {
    pub fn new(collection: Collection<BlogDocument>) -> Self {
        Self { collection }
    }
}

#[tonic::async_trait]
impl BlogService for BlogHandler {
    async fn create_blog(
        &self,
        request: Request<CreateBlogRequest>,
    ) -> Result<Response<CreateBlogResponse>, Status> {
        tracing::info!("create_blog invoked");

        let blog = request.into_inner().blog.ok_or(Error::InvalidArgument {
            reason: "request carried no blog".to_string(),
        })?;

        let unsaved = BlogDocument::from_request(blog);
        let inserted = self
            .collection
            .insert_one(&unsaved, None)
            .await
            .map_err(Error::internal)?;
        let oid = inserted
            .inserted_id
            .as_object_id()
            .ok_or_else(|| Error::internal("inserted id is not an ObjectId"))?;

        let stored = BlogDocument {
            id: Some(oid),
            ..unsaved
        };
        Ok(Response::new(CreateBlogResponse {
            blog: Some(stored.into()),
        }))
    }

    async fn read_blog(
        &self,
        request: Request<ReadBlogRequest>,
    ) -> Result<Response<ReadBlogResponse>, Status> {
        let blog_id = request.into_inner().blog_id;
        tracing::info!(%blog_id, "read_blog invoked");

        let oid = parse_object_id(&blog_id)?;
        let found = self
            .collection
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(Error::internal)?
            .ok_or(Error::NotFound {
                reason: format!("no blog with id {blog_id}"),
            })?;

        Ok(Response::new(ReadBlogResponse {
            blog: Some(found.into()),
        }))
    }

    async fn update_blog(
        &self,
        request: Request<UpdateBlogRequest>,
    ) -> Result<Response<UpdateBlogResponse>, Status> {
        let blog = request.into_inner().blog.ok_or(Error::InvalidArgument {
            reason: "request carried no blog".to_string(),
        })?;
        tracing::info!(blog_id = %blog.id, "update_blog invoked");

        let oid = parse_object_id(&blog.id)?;
        let mut stored = self
            .collection
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(Error::internal)?
            .ok_or(Error::NotFound {
                reason: format!("no blog with id {}", blog.id),
            })?;

        stored.author_id = blog.author_id;
        stored.title = blog.title;
        stored.content = blog.content;

        self.collection
            .replace_one(doc! { "_id": oid }, &stored, None)
            .await
            .map_err(Error::internal)?;

        Ok(Response::new(UpdateBlogResponse {
            blog: Some(stored.into()),
        }))
    }

    async fn delete_blog(
        &self,
        request: Request<DeleteBlogRequest>,
    ) -> Result<Response<DeleteBlogResponse>, Status> {
        let blog_id = request.into_inner().blog_id;
        tracing::info!(%blog_id, "delete_blog invoked");

        let oid = parse_object_id(&blog_id)?;
        let result = self
            .collection
            .delete_one(doc! { "_id": oid }, None)
            .await
            .map_err(Error::internal)?;
        if result.deleted_count == 0 {
            return Err(Error::NotFound {
                reason: format!("no blog with id {blog_id}"),
            }
            .into());
        }

        Ok(Response::new(DeleteBlogResponse { blog_id }))
    }

    type ListBlogStream = Pin<Box<dyn Stream<Item = Result<ListBlogResponse, Status>> + Send>>;

    async fn list_blog(
        &self,
        _request: Request<ListBlogRequest>,
    ) -> Result<Response<Self::ListBlogStream>, Status> {
        tracing::info!("list_blog invoked");

        let cursor = self
            .collection
            .find(None, None)
            .await
            .map_err(Error::internal)?;

        let stream = cursor.map(|item| match item {
            Ok(found) => Ok(ListBlogResponse {
                blog: Some(found.into()),
            }),
            Err(err) => Err(Error::internal(err).into()),
        });

        Ok(Response::new(Box::pin(stream)))
    }
}
