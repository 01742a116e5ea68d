//! End-to-end tests for the request validation paths of the blog service.
//!
//! These run without a MongoDB instance: the driver connects lazily, and the
//! exercised paths reject the request before any database operation is issued.

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::Code;
use workshop_blog::server::handler::BlogHandler;
use workshop_blog::server::store::BlogDocument;
use workshop_core::blog::blog_service_client::BlogServiceClient;
use workshop_core::blog::blog_service_server::BlogServiceServer;
use workshop_core::blog::{Blog, DeleteBlogRequest, ReadBlogRequest, UpdateBlogRequest};

async fn spawn_server() -> String {
    // Nothing here dials the database, so an unroutable URI is fine.
    let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:1")
        .await
        .unwrap();
    let collection = client.database("mydb").collection::<BlogDocument>("blog");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = BlogServiceServer::new(BlogHandler::new(collection));
    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn read_with_a_malformed_id_is_invalid_argument() {
    let addr = spawn_server().await;
    let mut client = BlogServiceClient::connect(addr).await.unwrap();

    let status = client
        .read_blog(ReadBlogRequest {
            blog_id: "not-an-object-id".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn delete_with_a_malformed_id_is_invalid_argument() {
    let addr = spawn_server().await;
    let mut client = BlogServiceClient::connect(addr).await.unwrap();

    let status = client
        .delete_blog(DeleteBlogRequest {
            blog_id: "short".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn update_without_a_blog_payload_is_invalid_argument() {
    let addr = spawn_server().await;
    let mut client = BlogServiceClient::connect(addr).await.unwrap();

    let status = client
        .update_blog(UpdateBlogRequest { blog: None })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn update_with_a_malformed_id_is_invalid_argument() {
    let addr = spawn_server().await;
    let mut client = BlogServiceClient::connect(addr).await.unwrap();

    let status = client
        .update_blog(UpdateBlogRequest {
            blog: Some(Blog {
                id: "garbage".to_string(),
                author_id: "ada".to_string(),
                title: "t".to_string(),
                content: "c".to_string(),
            }),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}
