//! Declarative macro for UPnP actions that take an `InstanceID` and answer
//! with an empty response element.

/// Define an operation whose response carries no data
///
/// Generates the `<Op>Request` struct (with an implicit `instance_id`), the
/// zero-sized operation type and its [`SonosOperation`](crate::operation::SonosOperation)
/// impl. Each argument names the XML element it is sent as. The request's
/// `Validate` impl is written by hand next to the definition.
///
/// # Example
/// ```rust,ignore
/// define_upnp_operation! {
///     operation: PlayOperation,
///     action: "Play",
///     service: AVTransport,
///     request: {
///         speed: String => "Speed",
///     },
/// }
/// impl Validate for PlayOperationRequest {}
/// ```
#[macro_export]
macro_rules! define_upnp_operation {
    (
        $(#[$meta:meta])*
        operation: $op_struct:ident,
        action: $action:literal,
        service: $service:ident,
        request: {
            $($field:ident: $field_type:ty => $xml_name:literal),* $(,)?
        } $(,)?
    ) => {
        ::paste::paste! {
            #[derive(serde::Serialize, Clone, Debug, PartialEq)]
            pub struct [<$op_struct Request>] {
                $(pub $field: $field_type,)*
                pub instance_id: u32,
            }

            $(#[$meta])*
            pub struct $op_struct;

            impl $crate::operation::SonosOperation for $op_struct {
                type Request = [<$op_struct Request>];
                type Response = ();

                const SERVICE: $crate::service::Service = $crate::service::Service::$service;
                const ACTION: &'static str = $action;

                fn build_payload(request: &Self::Request) -> String {
                    #[allow(unused_mut)]
                    let mut xml = format!("<InstanceID>{}</InstanceID>", request.instance_id);
                    $(
                        xml.push_str(&$crate::operation::xml_element($xml_name, &request.$field.to_string()));
                    )*
                    xml
                }

                fn parse_response(_xml: &xmltree::Element) -> Result<Self::Response, $crate::error::ApiError> {
                    Ok(())
                }
            }
        }
    };
}
