pub mod callback_route;
