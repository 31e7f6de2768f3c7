use interfaces::connector_types::BoxedConnector;

use crate::connectors::E24Pipe;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectorEnum {
    #[default]
    E24Pipe,
}

#[derive(Clone)]
pub struct ConnectorData {
    pub connector: BoxedConnector,
    pub connector_name: ConnectorEnum,
}

impl ConnectorData {
    pub fn get_connector_by_name(connector_name: &ConnectorEnum) -> Self {
        let connector = Self::convert_connector(*connector_name);
        Self {
            connector,
            connector_name: *connector_name,
        }
    }

    fn convert_connector(connector_name: ConnectorEnum) -> BoxedConnector {
        match connector_name {
            ConnectorEnum::E24Pipe => Box::new(E24Pipe::new()),
        }
    }
}

impl std::fmt::Debug for ConnectorData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorData")
            .field("connector", &self.connector.id())
            .field("connector_name", &self.connector_name)
            .finish()
    }
}

/// A decoded gateway answer paired with the router data of the flow that produced it
pub struct ResponseRouterData<Response, RouterData> {
    pub response: Response,
    pub router_data: RouterData,
}
