pub mod opensearch;
pub mod solr;

pub use opensearch::OpenSearchStore;
pub use solr::SolrStore;
