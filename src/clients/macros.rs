/// Generates `new` and the by-id lookup for clients that wrap a single
/// `ResourceClient`.
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, fn $get:ident) => {
        impl $client_name {
            pub fn new(inner: crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }

            #[tracing::instrument(skip(self))]
            pub async fn $get(
                &self,
                id: <$entity as crate::actor_framework::Entity>::Id,
            ) -> Result<Option<$entity>, $error> {
                tracing::debug!("Sending request");
                self.inner.get(id).await.map_err(<$error>::from)
            }
        }
    };
}
